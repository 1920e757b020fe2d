use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::client::MetricsClient;
use crate::config::AppConfig;
use crate::history::HistoryBuffer;
use crate::models::network::NetworkHistoryPoint;
use crate::models::{Host, HostId, HostStatus};
use crate::poller::Poller;

/// Read-only view handed to consumers after each poll cycle or prune sweep.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Number of completed poll cycles.
    pub cycle: u64,
    pub updated_at: Option<DateTime<Local>>,
    pub statuses: IndexMap<HostId, HostStatus>,
    pub history: IndexMap<HostId, Vec<NetworkHistoryPoint>>,
}

impl DashboardSnapshot {
    pub fn online_count(&self) -> usize {
        self.statuses.values().filter(|s| s.is_online()).count()
    }
}

/// Owns the host list, the latest statuses and the network history, and
/// drives the poll and prune timers.
pub struct Dashboard {
    hosts: Vec<Host>,
    poller: Poller,
    history: HistoryBuffer,
    poll_interval: Duration,
    prune_interval: Duration,
}

impl Dashboard {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = MetricsClient::new(config.polling.timeout(), &config.polling.endpoint)
            .context("Failed to build HTTP client")?;

        Self::with_poller(
            config.hosts(),
            Poller::new(client),
            HistoryBuffer::with_capacity(config.polling.history_capacity),
            config.polling.interval(),
            config.polling.prune_interval(),
        )
    }

    /// Fails if two hosts share an id, since statuses and history are keyed
    /// by it.
    pub fn with_poller(
        hosts: Vec<Host>,
        poller: Poller,
        history: HistoryBuffer,
        poll_interval: Duration,
        prune_interval: Duration,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(hosts.len());
        for host in &hosts {
            if !seen.insert(host.id()) {
                bail!("Duplicate host name: {}", host.name);
            }
        }

        Ok(Self {
            hosts,
            poller,
            history,
            poll_interval,
            prune_interval,
        })
    }

    /// Spawn the driver task. It runs until [`DashboardHandle::stop`] is
    /// called or the handle is dropped.
    pub fn start(self) -> DashboardHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(DashboardSnapshot::default()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.drive(snapshot_tx, shutdown_rx));

        DashboardHandle {
            snapshots: snapshot_rx,
            shutdown_tx,
            task,
        }
    }

    async fn drive(
        mut self,
        snapshots: watch::Sender<Arc<DashboardSnapshot>>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!(
            "Dashboard started: {} hosts, poll every {} ms, prune every {} ms",
            self.hosts.len(),
            self.poll_interval.as_millis(),
            self.prune_interval.as_millis()
        );
        for host in &self.hosts {
            debug!("Watching {} at {} ({})", host.name, host.address, host.platform);
        }

        let mut poll_timer = interval(self.poll_interval);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut prune_timer = interval_at(Instant::now() + self.prune_interval, self.prune_interval);
        prune_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut statuses = IndexMap::new();
        let mut cycle = 0u64;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = poll_timer.tick() => {
                    let round = tokio::select! {
                        result = self.poller.poll_once(&self.hosts, &mut self.history) => Some(result),
                        _ = &mut shutdown => None,
                    };
                    let Some(result) = round else {
                        debug!("Shutdown during poll cycle, abandoning in-flight requests");
                        break;
                    };
                    statuses = result;
                    cycle += 1;
                    snapshots.send_replace(Arc::new(self.snapshot(cycle, &statuses)));
                }
                _ = prune_timer.tick() => {
                    self.history.prune_all();
                    snapshots.send_replace(Arc::new(self.snapshot(cycle, &statuses)));
                }
            }
        }

        info!("Dashboard stopped after {} poll cycles", cycle);
    }

    fn snapshot(&self, cycle: u64, statuses: &IndexMap<HostId, HostStatus>) -> DashboardSnapshot {
        let history = self
            .hosts
            .iter()
            .map(|host| {
                let id = host.id();
                let points = self.history.read(&id);
                (id, points)
            })
            .collect();

        DashboardSnapshot {
            cycle,
            updated_at: Some(Local::now()),
            statuses: statuses.clone(),
            history,
        }
    }
}

/// Control side of a running [`Dashboard`].
pub struct DashboardHandle {
    snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Arc<DashboardSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Stop both timers. A poll cycle in progress is abandoned; its requests
    /// are dropped.
    pub async fn stop(self) -> Result<()> {
        // The task may already be gone; then there is nobody to notify.
        let _ = self.shutdown_tx.send(());
        self.task.await.context("Dashboard task failed")?;
        Ok(())
    }
}
