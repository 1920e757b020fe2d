pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod models;
pub mod normalize;
pub mod poller;

mod utils;

use crate::config::AppConfig;
use crate::dashboard::{Dashboard, DashboardSnapshot};
use anyhow::{anyhow, Context};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::watch;

pub use crate::error::HostError;
pub use crate::history::HistoryBuffer;
pub use crate::models::{Host, HostId, HostStatus, MetricsSnapshot, PlatformKind};
pub use crate::normalize::normalize;
pub use crate::poller::Poller;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting application");

    let dashboard = Dashboard::new(&config).context("Failed to build dashboard")?;
    let handle = dashboard.start();
    let mut updates = handle.subscribe();

    tokio::select! {
        result = report(&mut updates) => {
            if let Err(e) = result {
                error!("Application error: {e:#}");
                // Print chain of error causes
                let mut source = e.source();
                while let Some(e) = source {
                    error!("Caused by: {e}");
                    source = e.source();
                }
                return Err(e).context("Application failed to run");
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    handle.stop().await?;
    info!("Application completed successfully");
    Ok(())
}

// Log one summary line per host after each completed poll cycle
async fn report(updates: &mut watch::Receiver<Arc<DashboardSnapshot>>) -> anyhow::Result<()> {
    let mut last_cycle = 0;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.cycle == last_cycle {
            continue; // prune sweep only
        }
        last_cycle = snapshot.cycle;

        info!(
            "Cycle {}: {}/{} hosts online",
            snapshot.cycle,
            snapshot.online_count(),
            snapshot.statuses.len()
        );
        for (host, status) in &snapshot.statuses {
            info!("  {}: {}", host, status);
        }
    }
    Err(anyhow!("Dashboard stopped unexpectedly"))
}
