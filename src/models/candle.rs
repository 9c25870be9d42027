//! Candle and kline models
//!
//! `Candle` and `Klines` keep exact decimals. `KlinesResponse` is the
//! UDF wire shape and is the only place prices become `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::candles;
use crate::error::ChartError;
use crate::models::period::Resolution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    pub t: i64,
    pub o: Decimal,
    pub h: Decimal,
    pub l: Decimal,
    pub c: Decimal,
    pub v: Decimal,
}

impl Candle {
    /// Zero-valued candle for a bucket with no trades
    pub fn empty(t: i64) -> Self {
        Self {
            t,
            o: Decimal::ZERO,
            h: Decimal::ZERO,
            l: Decimal::ZERO,
            c: Decimal::ZERO,
            v: Decimal::ZERO,
        }
    }
}

/// A candle that belongs to a persisted series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCandle {
    pub symbol: String,
    pub resolution: Resolution,
    pub candle: Candle,
}

impl TryFrom<candles::Model> for SeriesCandle {
    type Error = ChartError;

    fn try_from(model: candles::Model) -> Result<Self, Self::Error> {
        Ok(SeriesCandle {
            resolution: Resolution::parse(&model.resolution)?,
            symbol: model.symbol,
            candle: Candle {
                t: model.t,
                o: model.o,
                h: model.h,
                l: model.l,
                c: model.c,
                v: model.v,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KlineStatus {
    Ok,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Klines {
    pub status: KlineStatus,
    pub candles: Vec<Candle>,
}

impl Klines {
    pub fn no_data() -> Self {
        Self {
            status: KlineStatus::NoData,
            candles: Vec::new(),
        }
    }
}

/// Query parameters for GET /history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub symbol: String,
    pub resolution: String,
    pub from: i64,
    pub to: i64,
}

/// UDF history response: parallel arrays, one entry per bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlinesResponse {
    pub s: KlineStatus,
    pub t: Vec<i64>,
    pub o: Vec<f64>,
    pub h: Vec<f64>,
    pub l: Vec<f64>,
    pub c: Vec<f64>,
    pub v: Vec<f64>,
}

fn to_wire(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

impl From<Klines> for KlinesResponse {
    fn from(klines: Klines) -> Self {
        let n = klines.candles.len();
        let mut response = KlinesResponse {
            s: klines.status,
            t: Vec::with_capacity(n),
            o: Vec::with_capacity(n),
            h: Vec::with_capacity(n),
            l: Vec::with_capacity(n),
            c: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
        };
        for candle in klines.candles {
            response.t.push(candle.t);
            response.o.push(to_wire(candle.o));
            response.h.push(to_wire(candle.h));
            response.l.push(to_wire(candle.l));
            response.c.push(to_wire(candle.c));
            response.v.push(to_wire(candle.v));
        }
        response
    }
}
