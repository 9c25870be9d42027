//! Incremental candle sync
//!
//! Extends a persisted candle series one closed bucket at a time:
//! - Bootstrapping: no candle yet, start at the earliest trade's bucket
//! - Resuming: start right after the last persisted candle's bucket
//! - Draining: write every bucket until the newest trade or the
//!   wall clock is reached
//!
//! A bucket is written only once its end has passed, so repeated runs
//! never rewrite or duplicate a bucket.

use std::sync::Arc;

use chrono::DateTime;
use tracing::{debug, error, info};

use crate::error::ChartError;
use crate::models::candle::{Candle, SeriesCandle};
use crate::models::period::{round_boundary, Direction, Resolution};
use crate::models::symbol::SymbolCatalog;
use crate::services::bucketing;
use crate::services::store::{ChartStore, TimeWindow, TradeBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Bootstrapping { first_trade: i64 },
    Resuming { last_candle: i64 },
}

impl SyncState {
    /// Timestamp the next bucket is derived from
    pub fn resume_point(&self, resolution: Resolution) -> i64 {
        match *self {
            SyncState::Bootstrapping { first_trade } => first_trade,
            SyncState::Resuming { last_candle } => resolution.bucket_end(last_candle) + 1,
        }
    }
}

/// Outcome of one `advance` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub symbol: String,
    pub resolution: Resolution,
    pub state: SyncState,
    pub candles_written: usize,
    /// Start of the last bucket written in this run
    pub last_bucket: Option<i64>,
}

#[derive(Clone)]
pub struct ChartSyncService {
    store: Arc<dyn ChartStore>,
    catalog: Arc<SymbolCatalog>,
}

fn fmt_ts(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%d-%b %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

impl ChartSyncService {
    pub fn new(store: Arc<dyn ChartStore>, catalog: Arc<SymbolCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Write every closed, not yet persisted bucket of the
    /// `(symbol, resolution)` series. `now` is the wall clock in Unix
    /// seconds.
    pub async fn advance(
        &self,
        symbol: &str,
        resolution: Resolution,
        now: i64,
    ) -> Result<SyncReport, ChartError> {
        let info = self.catalog.get(symbol)?;
        let pair = &info.pair;

        let TradeBounds { first, last } = self
            .store
            .trade_time_bounds(pair)
            .await?
            .ok_or_else(|| ChartError::NoTradesAvailable {
                symbol: symbol.to_string(),
            })?;

        let state = match self.store.latest_candle(symbol, resolution).await? {
            Some(candle) => SyncState::Resuming {
                last_candle: candle.t,
            },
            None => SyncState::Bootstrapping { first_trade: first },
        };

        let resume = state.resume_point(resolution);
        let start = round_boundary(resume, Direction::Down, resolution);
        let width = resolution.duration_seconds();

        info!(
            symbol = %symbol,
            resolution = %resolution,
            interval = resolution.interval(),
            state = ?state,
            start = %fmt_ts(start),
            last_trade = %fmt_ts(last),
            "Draining candle buckets"
        );

        let mut report = SyncReport {
            symbol: symbol.to_string(),
            resolution,
            state,
            candles_written: 0,
            last_bucket: None,
        };

        let mut from = start;
        loop {
            let to = from + width;
            // An open bucket is left for a later run
            if from > last || to > now {
                break;
            }

            let trades = self
                .store
                .find_trades(pair, TimeWindow::half_open(from, to))
                .await?;
            let klines = bucketing::bucketize(&trades, pair, resolution, from, to);

            let mut candle = klines
                .candles
                .into_iter()
                .next()
                .unwrap_or_else(|| Candle::empty(from));
            candle.t = from;

            let series_candle = SeriesCandle {
                symbol: symbol.to_string(),
                resolution,
                candle,
            };
            if let Err(e) = self.store.insert_candle(&series_candle).await {
                error!(
                    symbol = %symbol,
                    resolution = %resolution,
                    bucket = from,
                    written = report.candles_written,
                    error = %e,
                    "Candle insert failed, aborting sync run"
                );
                return Err(e);
            }

            debug!(
                from = %fmt_ts(from),
                to = %fmt_ts(to),
                trades = trades.len(),
                o = %series_candle.candle.o,
                c = %series_candle.candle.c,
                v = %series_candle.candle.v,
                "Candle written"
            );

            report.candles_written += 1;
            report.last_bucket = Some(from);
            from = to;
        }

        info!(
            symbol = %symbol,
            resolution = %resolution,
            written = report.candles_written,
            "Candle sync complete"
        );

        Ok(report)
    }
}
