//! Next-hop Manager - candidate set ownership and the
//! refresh/allocate/emit pipeline.

use std::net::IpAddr;

use async_trait::async_trait;
use nhmgr_common::{
    AssignmentSink, ConfigChangeHandler, ConfigEntry, NeighborChangeHandler, NhMgrError,
    NhMgrResult, ReachabilityOracle,
};
use tracing::{debug, error, info, instrument, warn};

use crate::allocator::{self, Assignment};
use crate::types::NexthopSet;

/// Next-hop group manager.
///
/// Owns the candidate set and the last emitted assignment, consults the
/// reachability oracle before every allocation, and emits the result to
/// the assignment sink. Handles one trigger at a time; the dispatcher
/// guarantees no two recomputations overlap.
pub struct NexthopMgr<O, S> {
    /// Group identifier used with the sink
    group_name: String,

    /// Current candidate set, replaced wholesale on config changes
    set: NexthopSet,

    /// Last successfully emitted assignment
    current: Option<Assignment>,

    oracle: O,
    sink: S,
}

impl<O, S> NexthopMgr<O, S>
where
    O: ReachabilityOracle,
    S: AssignmentSink,
{
    /// Creates a manager with an empty candidate set.
    pub fn new(group_name: impl Into<String>, oracle: O, sink: S) -> Self {
        Self {
            group_name: group_name.into(),
            set: NexthopSet::new(),
            current: None,
            oracle,
            sink,
        }
    }

    /// The group name emitted to the sink.
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// The current candidate set.
    pub fn nexthop_set(&self) -> &NexthopSet {
        &self.set
    }

    /// The last successfully emitted assignment, if any.
    pub fn current_assignment(&self) -> Option<&Assignment> {
        self.current.as_ref()
    }

    /// Re-resolves reachability for every entry from the oracle.
    ///
    /// Runs before every allocation and is never cached: reachability is
    /// the one input expected to change frequently. A malformed address is
    /// reported and leaves its entry unreachable while keeping it in the
    /// set for ordering.
    async fn refresh_reachability(&mut self) {
        for entry in self.set.entries_mut() {
            entry.reachable = match entry.parsed_address() {
                Some(addr) => self.oracle.is_reachable(addr).await,
                None => {
                    warn!(
                        index = entry.index,
                        "Treating as unreachable: {}",
                        NhMgrError::address_parse(&entry.address)
                    );
                    false
                }
            };
        }
        debug!(entries = ?self.set.entries(), "Refreshed next-hop reachability");
    }

    /// Allocates from the current set and pushes the result to the sink.
    ///
    /// On arithmetic overflow the previous assignment and the sink are left
    /// untouched; the error propagates to the caller for reporting.
    async fn allocate_and_emit(&mut self) -> NhMgrResult<()> {
        match allocator::allocate(&self.set)? {
            Some(assignment) => {
                info!(
                    group = %self.group_name,
                    slots = assignment.len(),
                    weights = ?assignment.address_weights(),
                    "Updating next-hop group"
                );
                self.sink
                    .set_group(&self.group_name, assignment.slots())
                    .await?;
                self.current = Some(assignment);
            }
            None => {
                info!(
                    group = %self.group_name,
                    "No reachable next-hops, removing group"
                );
                self.remove_group().await?;
            }
        }
        Ok(())
    }

    /// Removes the group from the sink and forgets the assignment.
    async fn remove_group(&mut self) -> NhMgrResult<()> {
        self.sink.remove_group(&self.group_name).await?;
        self.current = None;
        Ok(())
    }

    /// Full recompute path for reachability triggers: refresh, allocate,
    /// emit. The candidate set itself is unchanged.
    async fn rebuild_group(&mut self) {
        self.refresh_reachability().await;
        if let Err(e) = self.allocate_and_emit().await {
            error!(group = %self.group_name, "Next-hop group update failed: {}", e);
        }
    }

    /// Polls the oracle and recomputes only if any entry's reachability
    /// changed since the last refresh.
    ///
    /// This is the portable driver for hosts without a neighbor-table
    /// subscription; event-based hosts call the handler methods directly.
    #[instrument(skip(self))]
    pub async fn poll_reachability(&mut self) {
        if self.set.is_empty() {
            return;
        }

        let before: Vec<bool> = self.set.entries().iter().map(|e| e.reachable).collect();
        self.refresh_reachability().await;
        let after: Vec<bool> = self.set.entries().iter().map(|e| e.reachable).collect();

        if before != after {
            info!(group = %self.group_name, "Next-hop reachability changed");
            if let Err(e) = self.allocate_and_emit().await {
                error!(group = %self.group_name, "Next-hop group update failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl<O, S> ConfigChangeHandler for NexthopMgr<O, S>
where
    O: ReachabilityOracle,
    S: AssignmentSink,
{
    #[instrument(skip(self, entries))]
    async fn on_config_change(&mut self, entries: Vec<ConfigEntry>) {
        self.set = NexthopSet::rebuild(&entries);
        info!(
            group = %self.group_name,
            nexthops = self.set.len(),
            "Next-hop configuration changed"
        );

        if self.set.is_empty() {
            warn!("Next-hops not defined. Check config.");
            if let Err(e) = self.remove_group().await {
                error!(group = %self.group_name, "Failed to remove next-hop group: {}", e);
            }
            return;
        }

        self.rebuild_group().await;
    }
}

#[async_trait]
impl<O, S> NeighborChangeHandler for NexthopMgr<O, S>
where
    O: ReachabilityOracle,
    S: AssignmentSink,
{
    #[instrument(skip(self))]
    async fn on_neighbor_set(&mut self, address: IpAddr) {
        if !self.set.contains_address(address) {
            debug!(%address, "Neighbor event for non-member address, ignoring");
            return;
        }
        self.rebuild_group().await;
    }

    #[instrument(skip(self))]
    async fn on_neighbor_del(&mut self, address: IpAddr) {
        if !self.set.contains_address(address) {
            debug!(%address, "Neighbor event for non-member address, ignoring");
            return;
        }
        self.rebuild_group().await;
    }
}
