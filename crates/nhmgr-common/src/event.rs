//! Trigger events consumed by the next-hop manager dispatcher.

use std::net::IpAddr;

/// One raw entry from the configuration source: an ordinal key and the
/// next-hop address string it maps to.
///
/// Both sides are kept as strings at this stage. The index is parsed during
/// the candidate-set rebuild and the address only when reachability is
/// consulted, so a malformed value degrades that single entry rather than
/// the whole rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The ordinal key (e.g., "0", "1", "2")
    pub key: String,
    /// The raw next-hop address string
    pub address: String,
}

impl ConfigEntry {
    /// Creates a new configuration entry.
    pub fn new(key: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            address: address.into(),
        }
    }
}

/// A trigger handled by the dispatcher.
///
/// Every event causes a full, synchronous recompute; events are processed
/// strictly one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The configured next-hop set changed; carries the full new enumeration.
    ConfigChanged(Vec<ConfigEntry>),
    /// A neighbor record for the given address appeared.
    NeighborSet(IpAddr),
    /// A neighbor record for the given address went away.
    NeighborDel(IpAddr),
}
