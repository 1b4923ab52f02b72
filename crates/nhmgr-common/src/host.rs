//! Collaborator traits between the next-hop manager and its host.
//!
//! The manager core is pure computation; everything host-specific sits
//! behind one of these traits:
//!
//! - [`ReachabilityOracle`]: answers whether a next-hop has a live neighbor
//!   record (ARP/NDP)
//! - [`AssignmentSink`]: accepts the computed slot table, or its removal
//! - [`ConfigChangeHandler`] / [`NeighborChangeHandler`]: the two handler
//!   roles the dispatcher drives
//!
//! The two handler roles are deliberately independent traits. A single
//! manager implements both, but nothing forces the coupling on other
//! implementations.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::NhMgrResult;
use crate::event::ConfigEntry;

/// Answers next-hop reachability questions from live neighbor-table state.
///
/// Parse failures on address strings are the manager's responsibility; the
/// oracle is only ever asked about structured addresses. Implementations
/// that consult an external source should treat their own failures as
/// "not reachable" and log, never panic.
#[async_trait]
pub trait ReachabilityOracle: Send + Sync {
    /// Returns true if the address currently has an active neighbor record.
    async fn is_reachable(&self, address: IpAddr) -> bool;
}

/// Consumes slot assignments for a named next-hop group.
///
/// `set_group` is idempotent-replace: the new slot table wholesale
/// overwrites whatever the sink held for that group. `remove_group` must be
/// safe to call when no group currently exists.
#[async_trait]
pub trait AssignmentSink: Send {
    /// Replaces the group's slot table. `slots[i]` is the next-hop address
    /// forwarding slot `i` points at.
    async fn set_group(&mut self, name: &str, slots: &[IpAddr]) -> NhMgrResult<()>;

    /// Removes the group entirely, so that dependent static routing can
    /// fail over.
    async fn remove_group(&mut self, name: &str) -> NhMgrResult<()>;
}

/// Handler role for configuration-change triggers.
#[async_trait]
pub trait ConfigChangeHandler: Send {
    /// Called with the full new enumeration of configured next-hops.
    async fn on_config_change(&mut self, entries: Vec<ConfigEntry>);
}

/// Handler role for neighbor-table change triggers.
#[async_trait]
pub trait NeighborChangeHandler: Send {
    /// Called when a neighbor record for `address` appears.
    async fn on_neighbor_set(&mut self, address: IpAddr);

    /// Called when the neighbor record for `address` goes away.
    async fn on_neighbor_del(&mut self, address: IpAddr);
}
