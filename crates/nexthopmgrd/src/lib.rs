//! Resilient next-hop group manager daemon
//!
//! Distributes forwarding load across a configured set of next-hops using
//! an LCM-sized slot table, so that any number of next-hop failures still
//! leaves the surviving paths perfectly balanced. Reachability comes from
//! live neighbor-table state; the computed assignment is pushed to an
//! assignment sink (by default, a weighted multipath route).

mod allocator;
mod commands;
mod config;
mod dispatcher;
mod host;
mod nexthop_mgr;
mod types;

pub use allocator::{allocate, slot_weights, Assignment};
pub use commands::*;
pub use config::StartupConfig;
pub use dispatcher::Dispatcher;
pub use host::{NeighborTableOracle, RouteSink};
pub use nexthop_mgr::NexthopMgr;
pub use types::{NexthopEntry, NexthopSet, DEFAULT_GROUP_NAME};
