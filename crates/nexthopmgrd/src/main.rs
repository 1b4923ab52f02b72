//! nexthopmgrd - resilient next-hop group manager daemon
//!
//! Loads the configured next-hop set, computes the initial slot assignment,
//! and keeps it in sync with kernel neighbor-table reachability.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use nhmgr_common::Event;
use tokio::sync::mpsc;
use tracing::{error, info};

use nexthopmgrd::{Dispatcher, NeighborTableOracle, NexthopMgr, RouteSink, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "nexthopmgrd", about = "Resilient next-hop group manager")]
struct Args {
    /// Path to the startup configuration file
    #[arg(short, long, default_value = "/etc/nexthopmgrd/config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    info!("--- Starting nexthopmgrd (Rust) ---");

    let args = Args::parse();
    let config = match StartupConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let oracle = NeighborTableOracle::new();
    let sink = RouteSink::new(&config.route_prefix);
    let mgr = NexthopMgr::new(&config.group_name, oracle, sink);

    let (tx, rx) = mpsc::channel(64);
    let dispatcher = Dispatcher::new(mgr, rx)
        .with_poll_interval(Duration::from_secs(config.poll_interval_secs));

    // Initial configuration trigger; afterwards the poll loop tracks
    // reachability until a netlink neighbor subscription feeds the channel.
    if tx
        .send(Event::ConfigChanged(config.config_entries()))
        .await
        .is_err()
    {
        error!("Dispatcher channel closed before startup");
        return ExitCode::FAILURE;
    }

    let dispatcher_handle = tokio::spawn(dispatcher.run());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for shutdown signal: {}", e);
    }
    info!("Shutting down");

    drop(tx);
    if let Err(e) = dispatcher_handle.await {
        error!("Dispatcher task failed: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();
}
