//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate.

/// Invariants checked on generated inputs.
mod properties;
/// Small problems whose outcome is known exactly.
mod scenarios;
