//! Trade records as read from storage

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::entities::trades;
use crate::error::ChartError;

/// Swap between two assets with raw integer amounts.
///
/// Storage order of the two legs is not fixed: the same market shows up
/// both as (base, quote) and (quote, base).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub asset0: String,
    pub amount0: Decimal,
    pub asset1: String,
    pub amount1: Decimal,
    pub timestamp: i64,
}

impl Trade {
    pub fn new(
        asset0: impl Into<String>,
        amount0: Decimal,
        asset1: impl Into<String>,
        amount1: Decimal,
        timestamp: i64,
    ) -> Self {
        Self {
            asset0: asset0.into(),
            amount0,
            asset1: asset1.into(),
            amount1,
            timestamp,
        }
    }
}

/// Parse a raw integer amount stored as text
///
/// Only plain ASCII digits are accepted. Amounts of 2^96 raw units or more
/// do not fit a `Decimal` and are rejected.
pub fn parse_raw_amount(raw: &str) -> Result<Decimal, ChartError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChartError::persistence(
            "decode trade amount",
            format!("'{}' is not a non-negative integer", raw),
        ));
    }

    Decimal::from_str(raw)
        .map_err(|e| ChartError::persistence("decode trade amount", format!("'{}': {}", raw, e)))
}

impl TryFrom<trades::Model> for Trade {
    type Error = ChartError;

    fn try_from(model: trades::Model) -> Result<Self, Self::Error> {
        Ok(Trade {
            amount0: parse_raw_amount(&model.amount0)?,
            amount1: parse_raw_amount(&model.amount1)?,
            asset0: model.asset0,
            asset1: model.asset1,
            timestamp: model.timestamp,
        })
    }
}
