//! OHLCV bucketing engine
//!
//! Partitions the time axis into consecutive half-open buckets
//! `[start, start + width)` anchored at the caller's range start and
//! aggregates the trades of every non-empty bucket into a candle.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::candle::{Candle, KlineStatus, Klines};
use crate::models::period::Resolution;
use crate::models::symbol::AssetPair;
use crate::models::trade::Trade;
use crate::services::price_normalizer;

/// A trade reduced to what aggregation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedTrade {
    pub timestamp: i64,
    pub price: Decimal,
    /// Base-asset leg in token units
    pub volume: Decimal,
}

/// Price every trade against `pair`, dropping trades without a price.
/// Output is sorted by timestamp, ties keep input order.
pub fn price_trades(trades: &[Trade], pair: &AssetPair) -> Vec<PricedTrade> {
    let mut priced: Vec<PricedTrade> = trades
        .iter()
        .filter_map(|trade| {
            let price = match price_normalizer::price(trade, pair) {
                Ok(price) => price,
                Err(unpriced) => {
                    warn!(
                        timestamp = trade.timestamp,
                        asset0 = %trade.asset0,
                        asset1 = %trade.asset1,
                        reason = unpriced.reason(),
                        "Skipping unpriceable trade"
                    );
                    return None;
                }
            };
            Some(PricedTrade {
                timestamp: trade.timestamp,
                price,
                volume: price_normalizer::orient(trade, pair).base,
            })
        })
        .collect();

    priced.sort_by_key(|t| t.timestamp);
    priced
}

/// Aggregate a time-ordered, non-empty slice into one candle stamped
/// with its first trade's timestamp.
fn aggregate(bucket: &[PricedTrade]) -> Option<Candle> {
    let first = bucket.first()?;
    let last = bucket.last()?;

    let mut high = first.price;
    let mut low = first.price;
    let mut volume = Decimal::ZERO;
    for trade in bucket {
        high = high.max(trade.price);
        low = low.min(trade.price);
        volume += trade.volume;
    }

    Some(Candle {
        t: first.timestamp,
        o: first.price,
        h: high,
        l: low,
        c: last.price,
        v: volume,
    })
}

/// Bucket already-priced, sorted trades. Trades outside
/// `[range_start, range_end)` are ignored.
pub fn bucketize_priced(
    priced: &[PricedTrade],
    resolution: Resolution,
    range_start: i64,
    range_end: i64,
) -> Klines {
    // Range bounds come from clients, so offsets are computed in i128
    let width = i128::from(resolution.duration_seconds());
    let start = i128::from(range_start);
    let in_range: Vec<PricedTrade> = priced
        .iter()
        .copied()
        .filter(|t| t.timestamp >= range_start && t.timestamp < range_end)
        .collect();

    let mut candles = Vec::new();
    let mut idx = 0;
    while idx < in_range.len() {
        // Jump straight to the bucket holding the next trade; empty
        // buckets in between emit nothing.
        let offset = (i128::from(in_range[idx].timestamp) - start).div_euclid(width);
        let bucket_end = start + (offset + 1) * width;

        let len = in_range[idx..]
            .iter()
            .take_while(|t| i128::from(t.timestamp) < bucket_end)
            .count();
        if let Some(candle) = aggregate(&in_range[idx..idx + len]) {
            candles.push(candle);
        }
        idx += len;
    }

    if candles.is_empty() {
        Klines::no_data()
    } else {
        Klines {
            status: KlineStatus::Ok,
            candles,
        }
    }
}

/// Map an unordered set of trades into OHLCV buckets for `pair`
pub fn bucketize(
    trades: &[Trade],
    pair: &AssetPair,
    resolution: Resolution,
    range_start: i64,
    range_end: i64,
) -> Klines {
    let priced = price_trades(trades, pair);
    bucketize_priced(&priced, resolution, range_start, range_end)
}
