//! Test infrastructure for the next-hop group manager.
//!
//! Provides:
//! - A mock reachability oracle with settable neighbor state
//! - A recording assignment sink for verifying emitted slot tables
//! - Helpers for building configuration entry lists

pub mod fixtures;

pub use fixtures::*;
