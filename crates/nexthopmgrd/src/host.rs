//! Linux host integration: kernel neighbor-table oracle and a weighted
//! multipath route sink.

use std::net::IpAddr;

use async_trait::async_trait;
use nhmgr_common::{shell, AssignmentSink, NhMgrResult, ReachabilityOracle};
use tracing::{debug, info, warn};

use crate::allocator::slot_weights;
use crate::commands::{build_neigh_show_cmd, build_route_del_cmd, build_route_replace_cmd};

/// Neighbor states that count as an active record.
///
/// Matches kernel NUD semantics: anything except FAILED/INCOMPLETE (and an
/// absent entry) means the address has resolved at least once and is usable
/// as a forwarding target.
const ACTIVE_NEIGH_STATES: &[&str] = &[
    "REACHABLE",
    "STALE",
    "DELAY",
    "PROBE",
    "PERMANENT",
    "NOARP",
];

/// Returns true if `ip neigh show` output describes an active record.
fn neigh_output_active(output: &str) -> bool {
    output.lines().any(|line| {
        line.split_whitespace()
            .any(|token| ACTIVE_NEIGH_STATES.contains(&token))
    })
}

/// Reachability oracle backed by the kernel neighbor table via `ip neigh`.
#[derive(Debug, Clone, Default)]
pub struct NeighborTableOracle;

impl NeighborTableOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReachabilityOracle for NeighborTableOracle {
    async fn is_reachable(&self, address: IpAddr) -> bool {
        let cmd = build_neigh_show_cmd(address);
        match shell::exec(&cmd).await {
            Ok(result) if result.success() => neigh_output_active(&result.stdout),
            Ok(result) => {
                debug!(%address, exit_code = result.exit_code, "Neighbor lookup failed");
                false
            }
            Err(e) => {
                warn!(%address, "Neighbor lookup could not run: {}", e);
                false
            }
        }
    }
}

/// Assignment sink that renders the group as a weighted multipath route.
///
/// The slot table collapses to one `nexthop via <addr> weight <slots>` leg
/// per distinct address; `set_group` is a wholesale `ip route replace`,
/// `remove_group` an `ip route del` that tolerates a missing route.
pub struct RouteSink {
    route_prefix: String,

    /// Testing support
    #[cfg(test)]
    mock_mode: bool,
    #[cfg(test)]
    captured_commands: Vec<String>,
}

impl RouteSink {
    /// Creates a sink rendering under the given destination prefix.
    pub fn new(route_prefix: impl Into<String>) -> Self {
        Self {
            route_prefix: route_prefix.into(),
            #[cfg(test)]
            mock_mode: false,
            #[cfg(test)]
            captured_commands: Vec::new(),
        }
    }

    /// Execute shell command (with mock mode support)
    async fn exec(&mut self, cmd: &str) -> NhMgrResult<()> {
        #[cfg(test)]
        if self.mock_mode {
            self.captured_commands.push(cmd.to_string());
            return Ok(());
        }

        shell::exec_or_throw(cmd).await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn with_mock_mode(mut self) -> Self {
        self.mock_mode = true;
        self
    }

    #[cfg(test)]
    pub fn captured_commands(&self) -> &[String] {
        &self.captured_commands
    }
}

#[async_trait]
impl AssignmentSink for RouteSink {
    async fn set_group(&mut self, name: &str, slots: &[IpAddr]) -> NhMgrResult<()> {
        let weights = slot_weights(slots);
        let cmd = build_route_replace_cmd(&self.route_prefix, &weights);
        self.exec(&cmd).await?;
        info!(
            group = %name,
            prefix = %self.route_prefix,
            legs = weights.len(),
            "Installed weighted multipath route"
        );
        Ok(())
    }

    async fn remove_group(&mut self, name: &str) -> NhMgrResult<()> {
        let cmd = build_route_del_cmd(&self.route_prefix);

        #[cfg(test)]
        if self.mock_mode {
            self.captured_commands.push(cmd);
            return Ok(());
        }

        // Deleting an already-absent route is not a failure.
        match shell::exec(&cmd).await? {
            result if result.success() => {
                info!(group = %name, prefix = %self.route_prefix, "Removed route");
            }
            result => {
                debug!(
                    group = %name,
                    prefix = %self.route_prefix,
                    exit_code = result.exit_code,
                    "Route delete returned non-zero (route likely absent)"
                );
            }
        }
        Ok(())
    }
}
