//! Platform runtime entry point.
//!
//! Boots the flat-file store, wires the service and keeps the process alive
//! for transport layers to attach to. Change notifications are echoed at
//! debug level for operational visibility.

use anyhow::{Context, Result};
use platform_runtime::wiring::{self, limiter_sweep_task};
use shared_bus::EventFilter;
use shared_types::PlatformConfig;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How often expired rate-limit windows are pruned.
const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    platform_runtime::telemetry::init_tracing("info,platform_runtime=debug")?;

    let data_dir = std::env::var("JB_DATA_DIR").unwrap_or_else(|_| "data".into());
    let platform = wiring::open(Path::new(&data_dir), PlatformConfig::default())
        .with_context(|| format!("failed to open data directory {data_dir}"))?;

    let stats = platform.service.stats();
    info!(
        data_dir = %data_dir,
        users = stats.total_users,
        points_outstanding = stats.points_outstanding,
        "Platform ready"
    );

    tokio::spawn(limiter_sweep_task(
        platform.limiter.clone(),
        LIMITER_SWEEP_INTERVAL,
    ));

    let mut notifications = platform.bus.subscribe(EventFilter::all());
    tokio::spawn(async move {
        while let Some(event) = notifications.recv().await {
            debug!(?event, "change notification");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutting down");
    Ok(())
}
