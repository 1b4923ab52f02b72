//! Mock collaborators and data helpers for manager and dispatcher tests.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nhmgr_common::{AssignmentSink, ConfigEntry, NhMgrResult, ReachabilityOracle};

/// Mock reachability oracle backed by a settable address set.
///
/// Handles are cheap clones sharing the same state, so a test can keep one
/// handle while the manager owns another and flip reachability mid-test.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    reachable: Arc<Mutex<HashSet<IpAddr>>>,
}

impl MockOracle {
    /// Creates an oracle with no reachable addresses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an oracle that already reports the given addresses reachable.
    pub fn with_reachable(addresses: &[&str]) -> Self {
        let oracle = Self::new();
        for addr in addresses {
            oracle.set_reachable(addr.parse().expect("valid test address"));
        }
        oracle
    }

    /// Marks an address as having an active neighbor record.
    pub fn set_reachable(&self, address: IpAddr) {
        self.reachable.lock().unwrap().insert(address);
    }

    /// Removes the neighbor record for an address.
    pub fn set_unreachable(&self, address: IpAddr) {
        self.reachable.lock().unwrap().remove(&address);
    }
}

#[async_trait]
impl ReachabilityOracle for MockOracle {
    async fn is_reachable(&self, address: IpAddr) -> bool {
        self.reachable.lock().unwrap().contains(&address)
    }
}

/// One call captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `set_group(name, slots)`
    SetGroup {
        /// The group name.
        name: String,
        /// The emitted slot table.
        slots: Vec<IpAddr>,
    },
    /// `remove_group(name)`
    RemoveGroup {
        /// The group name.
        name: String,
    },
}

/// Assignment sink that records every call for later verification.
///
/// Clones share the captured call list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all captured calls.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the most recent captured call, if any.
    pub fn last_call(&self) -> Option<SinkCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Returns the slot table from the most recent `set_group`, skipping
    /// any trailing `remove_group` calls.
    pub fn last_slots(&self) -> Option<Vec<IpAddr>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|call| match call {
                SinkCall::SetGroup { slots, .. } => Some(slots.clone()),
                SinkCall::RemoveGroup { .. } => None,
            })
    }
}

#[async_trait]
impl AssignmentSink for RecordingSink {
    async fn set_group(&mut self, name: &str, slots: &[IpAddr]) -> NhMgrResult<()> {
        self.calls.lock().unwrap().push(SinkCall::SetGroup {
            name: name.to_string(),
            slots: slots.to_vec(),
        });
        Ok(())
    }

    async fn remove_group(&mut self, name: &str) -> NhMgrResult<()> {
        self.calls.lock().unwrap().push(SinkCall::RemoveGroup {
            name: name.to_string(),
        });
        Ok(())
    }
}

/// Builds configuration entries from `(index, address)` pairs.
pub fn config_entries(pairs: &[(&str, &str)]) -> Vec<ConfigEntry> {
    pairs
        .iter()
        .map(|(key, addr)| ConfigEntry::new(*key, *addr))
        .collect()
}

/// Three next-hops at indices 0..2, the canonical test group.
pub fn three_nexthops() -> Vec<ConfigEntry> {
    config_entries(&[("0", "10.0.0.1"), ("1", "10.0.0.2"), ("2", "10.0.0.3")])
}
