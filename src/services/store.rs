//! Trade and candle persistence
//!
//! `ChartStore` is the seam between the chart services and storage.
//! `SeaOrmStore` is the Postgres implementation; `MemoryStore` backs
//! tests and local runs without a database.

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;

use crate::entities::{
    candles, trades,
    prelude::{Candles, Trades},
};
use crate::error::ChartError;
use crate::models::candle::{Candle, SeriesCandle};
use crate::models::period::Resolution;
use crate::models::symbol::AssetPair;
use crate::models::trade::Trade;

/// Timestamp window for trade lookups. `to` is always exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
    pub from_inclusive: bool,
}

impl TimeWindow {
    /// `[from, to)`
    pub fn half_open(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            from_inclusive: true,
        }
    }

    /// `(from, to)`
    pub fn open(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            from_inclusive: false,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        let after_start = if self.from_inclusive {
            timestamp >= self.from
        } else {
            timestamp > self.from
        };
        after_start && timestamp < self.to
    }
}

/// Earliest and latest trade timestamps of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeBounds {
    pub first: i64,
    pub last: i64,
}

#[async_trait]
pub trait ChartStore: Send + Sync {
    /// `None` when the pair has no trades at all
    async fn trade_time_bounds(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<TradeBounds>, ChartError>;

    /// Trades of `pair` in either storage orientation, ascending by time
    async fn find_trades(
        &self,
        pair: &AssetPair,
        window: TimeWindow,
    ) -> Result<Vec<Trade>, ChartError>;

    async fn latest_candle(
        &self,
        symbol: &str,
        resolution: Resolution,
    ) -> Result<Option<Candle>, ChartError>;

    async fn insert_candle(&self, candle: &SeriesCandle) -> Result<(), ChartError>;
}

fn matches_pair(trade: &Trade, pair: &AssetPair) -> bool {
    (trade.asset0 == pair.base_asset && trade.asset1 == pair.quote_asset)
        || (trade.asset0 == pair.quote_asset && trade.asset1 == pair.base_asset)
}

// ============================================================================
// Postgres
// ============================================================================

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Both orientations of the pair
fn pair_condition(pair: &AssetPair) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(trades::Column::Asset0.eq(&pair.base_asset))
                .add(trades::Column::Asset1.eq(&pair.quote_asset)),
        )
        .add(
            Condition::all()
                .add(trades::Column::Asset0.eq(&pair.quote_asset))
                .add(trades::Column::Asset1.eq(&pair.base_asset)),
        )
}

/// Decode trade rows, skipping rows whose amounts are not usable so a
/// single bad row cannot block the whole window.
fn decode_trades(rows: Vec<trades::Model>) -> Vec<Trade> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            let timestamp = row.timestamp;
            match Trade::try_from(row) {
                Ok(trade) => Some(trade),
                Err(e) => {
                    warn!(
                        id = id,
                        timestamp = timestamp,
                        error = %e,
                        "Skipping undecodable trade row"
                    );
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl ChartStore for SeaOrmStore {
    async fn trade_time_bounds(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<TradeBounds>, ChartError> {
        let first = Trades::find()
            .filter(pair_condition(pair))
            .order_by_asc(trades::Column::Timestamp)
            .one(&self.db)
            .await
            .map_err(|e| ChartError::persistence("find first trade", e))?;

        let last = Trades::find()
            .filter(pair_condition(pair))
            .order_by_desc(trades::Column::Timestamp)
            .one(&self.db)
            .await
            .map_err(|e| ChartError::persistence("find last trade", e))?;

        Ok(match (first, last) {
            (Some(first), Some(last)) => Some(TradeBounds {
                first: first.timestamp,
                last: last.timestamp,
            }),
            _ => None,
        })
    }

    async fn find_trades(
        &self,
        pair: &AssetPair,
        window: TimeWindow,
    ) -> Result<Vec<Trade>, ChartError> {
        let lower = if window.from_inclusive {
            trades::Column::Timestamp.gte(window.from)
        } else {
            trades::Column::Timestamp.gt(window.from)
        };

        let rows = Trades::find()
            .filter(pair_condition(pair))
            .filter(lower)
            .filter(trades::Column::Timestamp.lt(window.to))
            .order_by_asc(trades::Column::Timestamp)
            .order_by_asc(trades::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ChartError::persistence("find trades", e))?;

        Ok(decode_trades(rows))
    }

    async fn latest_candle(
        &self,
        symbol: &str,
        resolution: Resolution,
    ) -> Result<Option<Candle>, ChartError> {
        let row = Candles::find()
            .filter(candles::Column::Symbol.eq(symbol))
            .filter(candles::Column::Resolution.eq(resolution.label()))
            .order_by_desc(candles::Column::T)
            .one(&self.db)
            .await
            .map_err(|e| ChartError::persistence("find latest candle", e))?;

        match row {
            Some(model) => Ok(Some(SeriesCandle::try_from(model)?.candle)),
            None => Ok(None),
        }
    }

    async fn insert_candle(&self, candle: &SeriesCandle) -> Result<(), ChartError> {
        let record = candles::ActiveModel {
            symbol: Set(candle.symbol.clone()),
            resolution: Set(candle.resolution.label().to_string()),
            t: Set(candle.candle.t),
            o: Set(candle.candle.o),
            h: Set(candle.candle.h),
            l: Set(candle.candle.l),
            c: Set(candle.candle.c),
            v: Set(candle.candle.v),
            ..Default::default()
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| ChartError::persistence("insert candle", e))?;
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: Mutex<Vec<Trade>>,
    candles: Mutex<Vec<SeriesCandle>>,
    /// Remaining successful inserts before every insert fails
    insert_budget: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        let store = Self::new();
        store.add_trades(trades);
        store
    }

    pub fn add_trades(&self, trades: impl IntoIterator<Item = Trade>) {
        self.trades.lock().extend(trades);
    }

    /// Let `n` more inserts succeed, then fail every insert
    pub fn fail_inserts_after(&self, n: usize) {
        *self.insert_budget.lock() = Some(n);
    }

    pub fn clear_insert_failures(&self) {
        *self.insert_budget.lock() = None;
    }

    /// Persisted candles of one series, in insertion order
    pub fn candles(&self, symbol: &str, resolution: Resolution) -> Vec<Candle> {
        self.candles
            .lock()
            .iter()
            .filter(|c| c.symbol == symbol && c.resolution == resolution)
            .map(|c| c.candle.clone())
            .collect()
    }
}

#[async_trait]
impl ChartStore for MemoryStore {
    async fn trade_time_bounds(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<TradeBounds>, ChartError> {
        let trades = self.trades.lock();
        let mut timestamps = trades
            .iter()
            .filter(|t| matches_pair(t, pair))
            .map(|t| t.timestamp);

        let Some(first) = timestamps.next() else {
            return Ok(None);
        };
        let (first, last) = timestamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Ok(Some(TradeBounds { first, last }))
    }

    async fn find_trades(
        &self,
        pair: &AssetPair,
        window: TimeWindow,
    ) -> Result<Vec<Trade>, ChartError> {
        let mut found: Vec<Trade> = self
            .trades
            .lock()
            .iter()
            .filter(|t| matches_pair(t, pair) && window.contains(t.timestamp))
            .cloned()
            .collect();
        found.sort_by_key(|t| t.timestamp);
        Ok(found)
    }

    async fn latest_candle(
        &self,
        symbol: &str,
        resolution: Resolution,
    ) -> Result<Option<Candle>, ChartError> {
        Ok(self
            .candles
            .lock()
            .iter()
            .filter(|c| c.symbol == symbol && c.resolution == resolution)
            .max_by_key(|c| c.candle.t)
            .map(|c| c.candle.clone()))
    }

    async fn insert_candle(&self, candle: &SeriesCandle) -> Result<(), ChartError> {
        let mut budget = self.insert_budget.lock();
        match budget.as_mut() {
            Some(0) => {
                return Err(ChartError::persistence(
                    "insert candle",
                    "store unavailable",
                ));
            }
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        self.candles.lock().push(candle.clone());
        Ok(())
    }
}
