//! Chart Sync Job
//!
//! Advances the configured candle series on a fixed cadence.
//! Supports graceful shutdown via SIGINT.

use std::env;

use chrono::Utc;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info, warn};

use crate::error::ChartError;
use crate::models::period::Resolution;
use crate::services::chart_sync::ChartSyncService;

/// Default sync interval in seconds (30 minutes)
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 1800;

/// Series synced when nothing is configured
const DEFAULT_SYNC_TARGETS: &str = "BTC/USDC:30";

/// Environment variable for sync interval
const ENV_SYNC_INTERVAL: &str = "CHART_SYNC_INTERVAL_SECS";

/// Environment variable for synced series, `SYMBOL:RESOLUTION[,SYMBOL:RESOLUTION...]`
const ENV_SYNC_TARGETS: &str = "CHART_SYNC_TARGETS";

/// Environment variable for dry run mode (logging only, no sync)
const ENV_DRY_RUN: &str = "CHART_SYNC_DRY_RUN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub symbol: String,
    pub resolution: Resolution,
}

/// Parse a comma-separated `SYMBOL:RESOLUTION` list
pub fn parse_targets(raw: &str) -> Result<Vec<SyncTarget>, ChartError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| -> Result<SyncTarget, ChartError> {
            let (symbol, resolution) = entry.rsplit_once(':').ok_or_else(|| {
                ChartError::InvalidResolution {
                    resolution: entry.to_string(),
                }
            })?;
            Ok(SyncTarget {
                symbol: symbol.trim().to_string(),
                resolution: Resolution::parse(resolution.trim())?,
            })
        })
        .collect()
}

/// Start the chart sync job
///
/// Spawns a background task that runs `advance` for every configured
/// series on each tick. Series are processed one after another so a
/// series never runs concurrently with itself; a failed run is logged
/// and retried on the next tick.
///
/// # Environment Variables
///
/// * `CHART_SYNC_INTERVAL_SECS` - Interval in seconds (default: 1800)
/// * `CHART_SYNC_TARGETS` - Series to sync (default: "BTC/USDC:30")
/// * `CHART_SYNC_DRY_RUN` - Set to "true" for logging only mode
pub async fn start_chart_sync_job(service: ChartSyncService) {
    tokio::spawn(async move {
        let sync_interval_secs: u64 = env::var(ENV_SYNC_INTERVAL)
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);

        let raw_targets =
            env::var(ENV_SYNC_TARGETS).unwrap_or_else(|_| DEFAULT_SYNC_TARGETS.to_string());
        let targets = match parse_targets(&raw_targets) {
            Ok(targets) if !targets.is_empty() => targets,
            Ok(_) => {
                warn!("No chart sync targets configured - chart sync job disabled");
                return;
            }
            Err(e) => {
                error!(
                    error = %e,
                    targets = %raw_targets,
                    "Invalid CHART_SYNC_TARGETS - chart sync job disabled"
                );
                return;
            }
        };

        let dry_run = env::var(ENV_DRY_RUN)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        info!(
            sync_interval_secs = sync_interval_secs,
            target_count = targets.len(),
            dry_run = dry_run,
            "Initializing chart sync job"
        );

        let mut interval = interval(TokioDuration::from_secs(sync_interval_secs));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping chart sync job gracefully");
                    break;
                }
                _ = interval.tick() => {
                    if dry_run {
                        info!("DRY RUN: Skipping chart sync");
                        continue;
                    }
                    run_targets(&service, &targets).await;
                }
            }
        }

        info!("Chart sync job stopped");
    });
}

async fn run_targets(service: &ChartSyncService, targets: &[SyncTarget]) {
    for target in targets {
        let now = Utc::now().timestamp();
        match service.advance(&target.symbol, target.resolution, now).await {
            Ok(report) => {
                info!(
                    symbol = %report.symbol,
                    resolution = %report.resolution,
                    written = report.candles_written,
                    "Chart sync completed"
                );
            }
            Err(ChartError::NoTradesAvailable { symbol }) => {
                warn!(symbol = %symbol, "No trades yet, nothing to sync");
            }
            Err(e) => {
                // Next tick resumes from the last written candle
                error!(
                    symbol = %target.symbol,
                    resolution = %target.resolution,
                    error = %e,
                    "Chart sync failed"
                );
            }
        }
    }
}
