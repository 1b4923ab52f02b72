//! Shell command builders for neighbor lookups and route programming.

use std::net::IpAddr;

use nhmgr_common::shell::{shellquote, IP_CMD};

/// Build neighbor-table lookup command for one address
///
/// Shows the kernel neighbor entry (ARP/NDP) for the address, if any
pub fn build_neigh_show_cmd(address: IpAddr) -> String {
    let family = if address.is_ipv6() { " -6" } else { "" };
    format!(
        "{}{} neigh show {}",
        IP_CMD,
        family,
        shellquote(&address.to_string())
    )
}

/// Build weighted multipath route replace command
///
/// Renders the slot assignment as one `nexthop via ... weight ...` leg per
/// distinct address
pub fn build_route_replace_cmd(prefix: &str, weights: &[(IpAddr, usize)]) -> String {
    let mut cmd = format!("{} route replace {}", IP_CMD, shellquote(prefix));
    for (address, weight) in weights {
        cmd.push_str(&format!(
            " nexthop via {} weight {}",
            shellquote(&address.to_string()),
            weight
        ));
    }
    cmd
}

/// Build route deletion command
///
/// Removes the rendered route so dependent routing fails over
pub fn build_route_del_cmd(prefix: &str) -> String {
    format!("{} route del {}", IP_CMD, shellquote(prefix))
}
