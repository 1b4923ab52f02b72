//! Candidate next-hop set model.

use std::net::IpAddr;

use nhmgr_common::{ConfigEntry, NhMgrError};
use tracing::warn;

/// Default next-hop group name consumed by the assignment sink.
pub const DEFAULT_GROUP_NAME: &str = "NH1";

/// One configured next-hop candidate.
///
/// The address is kept as the raw configured string; it is resolved to a
/// structured address only when reachability is consulted, so a malformed
/// address degrades this single entry instead of failing the rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NexthopEntry {
    /// Stable ordinal from the configuration source. Lower index means
    /// earlier slot-filling priority. Not necessarily contiguous.
    pub index: u32,
    /// Raw configured next-hop address string.
    pub address: String,
    /// Whether the next-hop currently has an active neighbor record.
    pub reachable: bool,
}

impl NexthopEntry {
    /// Creates an entry, initially unreachable.
    pub fn new(index: u32, address: impl Into<String>) -> Self {
        Self {
            index,
            address: address.into(),
            reachable: false,
        }
    }

    /// Parses the raw address string, if well-formed.
    pub fn parsed_address(&self) -> Option<IpAddr> {
        self.address.parse().ok()
    }
}

/// The ordered set of configured next-hop candidates.
///
/// Rebuilt wholesale on every configuration change and replaced atomically
/// by its owner. After a rebuild, entries are sorted ascending by index and
/// indices are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NexthopSet {
    entries: Vec<NexthopEntry>,
}

impl NexthopSet {
    /// Creates an empty set ("no group configured").
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw configuration entries.
    ///
    /// An entry whose key does not parse as a non-negative integer is
    /// dropped with a warning; a duplicate index keeps the first occurrence
    /// and the later duplicate is dropped with a warning. Both are operator
    /// configuration errors, neither aborts the rebuild.
    pub fn rebuild(config: &[ConfigEntry]) -> Self {
        let mut entries: Vec<NexthopEntry> = Vec::with_capacity(config.len());

        for raw in config {
            let index: u32 = match raw.key.parse() {
                Ok(i) => i,
                Err(e) => {
                    warn!(
                        address = %raw.address,
                        "Dropping next-hop entry: {}",
                        NhMgrError::config_parse(&raw.key, e.to_string())
                    );
                    continue;
                }
            };

            if let Some(existing) = entries.iter().find(|e| e.index == index) {
                warn!(
                    index,
                    kept = %existing.address,
                    dropped = %raw.address,
                    "Duplicate next-hop index in configuration, keeping first occurrence"
                );
                continue;
            }

            entries.push(NexthopEntry::new(index, raw.address.clone()));
        }

        entries.sort_by_key(|e| e.index);
        Self { entries }
    }

    /// Number of configured candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no next-hops are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending index order.
    pub fn entries(&self) -> &[NexthopEntry] {
        &self.entries
    }

    /// Mutable access for the reachability refresh.
    pub fn entries_mut(&mut self) -> &mut [NexthopEntry] {
        &mut self.entries
    }

    /// True if the given structured address matches any entry.
    pub fn contains_address(&self, address: IpAddr) -> bool {
        self.entries
            .iter()
            .any(|e| e.parsed_address() == Some(address))
    }
}
