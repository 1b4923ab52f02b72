//! Startup configuration for the daemon.
//!
//! A JSON file plays the role of the host configuration store: it carries
//! the group name, the prefix the group is rendered under, the poll
//! interval, and the indexed next-hop map. Index keys stay strings here;
//! they are validated during the candidate-set rebuild so one bad key does
//! not fail the whole load.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use nhmgr_common::ConfigEntry;
use serde::Deserialize;

use crate::types::DEFAULT_GROUP_NAME;

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Daemon startup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    /// Next-hop group name handed to the assignment sink.
    #[serde(default = "default_group_name")]
    pub group_name: String,

    /// Destination prefix the group is rendered under (e.g. "10.10.0.0/16").
    pub route_prefix: String,

    /// Seconds between reachability polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Ordinal index (as string) to next-hop address. BTreeMap keeps the
    /// enumeration deterministic.
    pub nexthops: BTreeMap<String, String>,
}

impl StartupConfig {
    /// Loads and parses the configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// The configured next-hops as raw configuration entries.
    pub fn config_entries(&self) -> Vec<ConfigEntry> {
        self.nexthops
            .iter()
            .map(|(key, address)| ConfigEntry::new(key.clone(), address.clone()))
            .collect()
    }
}
