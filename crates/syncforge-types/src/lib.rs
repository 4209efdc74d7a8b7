//! Shared Syncforge protocol and error model types.
//!
//! This crate is dependency-boundary-safe for both host and connector SDK usage.

pub mod errors;
pub mod protocol;
