//! Common infrastructure for the resilient next-hop group manager.
//!
//! This crate provides the shared functionality the `nexthopmgrd` daemon is
//! built on:
//!
//! - [`error`]: Error types for next-hop manager operations
//! - [`event`]: Trigger events consumed by the dispatcher
//! - [`host`]: Collaborator traits (reachability oracle, assignment sink,
//!   handler roles)
//! - [`shell`]: Safe shell command execution with proper quoting
//!
//! # Architecture
//!
//! The daemon follows an event-driven model:
//!
//! 1. A configuration source yields the ordered `(index, address)` next-hop
//!    candidates
//! 2. A reachability oracle answers whether a next-hop has a live neighbor
//!    record
//! 3. The manager computes a weighted slot assignment and hands it to an
//!    assignment sink (or removes the group when nothing is reachable)
//!
//! Configuration changes and neighbor changes are delivered as [`event::Event`]
//! values and handled strictly one at a time.

pub mod error;
pub mod event;
pub mod host;
pub mod shell;

// Re-export commonly used items at crate root
pub use error::{NhMgrError, NhMgrResult};
pub use event::{ConfigEntry, Event};
pub use host::{AssignmentSink, ConfigChangeHandler, NeighborChangeHandler, ReachabilityOracle};
