//! Event dispatcher: strictly sequential trigger processing.

use std::time::Duration;

use nhmgr_common::{
    AssignmentSink, ConfigChangeHandler, Event, NeighborChangeHandler, ReachabilityOracle,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::nexthop_mgr::NexthopMgr;

/// Drives the manager from a channel of trigger events.
///
/// Each event is handled to completion before the next one is taken, so no
/// two allocations ever run concurrently and the emitted assignment always
/// reflects the latest state at emission time. An optional poll interval
/// re-checks reachability between events for hosts without a neighbor-table
/// subscription.
pub struct Dispatcher<O, S> {
    mgr: NexthopMgr<O, S>,
    rx: mpsc::Receiver<Event>,
    poll_interval: Option<Duration>,
}

impl<O, S> Dispatcher<O, S>
where
    O: ReachabilityOracle,
    S: AssignmentSink,
{
    /// Creates a dispatcher reading from `rx`.
    pub fn new(mgr: NexthopMgr<O, S>, rx: mpsc::Receiver<Event>) -> Self {
        Self {
            mgr,
            rx,
            poll_interval: None,
        }
    }

    /// Enables periodic reachability polling.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Runs until every sender is dropped, then returns the manager.
    pub async fn run(mut self) -> NexthopMgr<O, S> {
        info!("Dispatcher running");

        let mut ticker = self.poll_interval.map(|interval| {
            let mut t = tokio::time::interval(interval);
            t.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            t
        });

        loop {
            match &mut ticker {
                Some(ticker) => tokio::select! {
                    event = self.rx.recv() => match event {
                        Some(event) => self.dispatch(event).await,
                        None => break,
                    },
                    _ = ticker.tick() => self.mgr.poll_reachability().await,
                },
                None => match self.rx.recv().await {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },
            }
        }

        info!("Dispatcher stopped");
        self.mgr
    }

    async fn dispatch(&mut self, event: Event) {
        debug!(?event, "Dispatching trigger");
        match event {
            Event::ConfigChanged(entries) => self.mgr.on_config_change(entries).await,
            Event::NeighborSet(address) => self.mgr.on_neighbor_set(address).await,
            Event::NeighborDel(address) => self.mgr.on_neighbor_del(address).await,
        }
    }
}
