//! Price derivation from raw trade amounts
//!
//! Every amount is scaled by its token decimals before dividing, and all
//! arithmetic stays in `Decimal`.

use rust_decimal::Decimal;

use crate::models::symbol::AssetPair;
use crate::models::trade::Trade;

/// 10^decimals; `decimals` is capped by the catalog at 28
fn pow10(decimals: u32) -> Decimal {
    Decimal::from_i128_with_scale(10i128.pow(decimals), 0)
}

/// Convert a raw integer amount into token units
pub fn format_units(raw: Decimal, decimals: u32) -> Decimal {
    (raw / pow10(decimals)).normalize()
}

/// Both legs of a trade oriented against a symbol, in token units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedAmounts {
    pub base: Decimal,
    pub quote: Decimal,
}

/// Orient a trade so that `base` is the pair's base asset, whichever
/// leg it was stored in.
pub fn orient(trade: &Trade, pair: &AssetPair) -> OrientedAmounts {
    let (raw_base, raw_quote) = if trade.asset0 == pair.base_asset {
        (trade.amount0, trade.amount1)
    } else {
        (trade.amount1, trade.amount0)
    };

    OrientedAmounts {
        base: format_units(raw_base, pair.base_decimals),
        quote: format_units(raw_quote, pair.quote_decimals),
    }
}

/// Why a trade could not be priced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unpriced {
    /// The base leg is zero, so the trade carries no price information
    ZeroBase,
    /// Quote per base does not fit in a `Decimal`
    Overflow,
}

impl Unpriced {
    pub fn reason(&self) -> &'static str {
        match self {
            Unpriced::ZeroBase => "zero base amount",
            Unpriced::Overflow => "price overflow",
        }
    }
}

/// Quote units per base unit
pub fn price(trade: &Trade, pair: &AssetPair) -> Result<Decimal, Unpriced> {
    let amounts = orient(trade, pair);
    if amounts.base.is_zero() {
        return Err(Unpriced::ZeroBase);
    }
    amounts
        .quote
        .checked_div(amounts.base)
        .map(|p| p.normalize())
        .ok_or(Unpriced::Overflow)
}
