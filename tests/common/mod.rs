#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use udf_backend::models::symbol::{SymbolCatalog, Token};
use udf_backend::models::trade::Trade;
use udf_backend::services::store::MemoryStore;

pub const BTC: &str = "0xbtc";
pub const USDC: &str = "0xusdc";
pub const ETH: &str = "0xeth";

/// BTC (8 decimals), USDC (6 decimals), ETH (9 decimals)
pub fn test_catalog() -> Arc<SymbolCatalog> {
    let tokens = [
        Token {
            symbol: "BTC".to_string(),
            asset_id: BTC.to_string(),
            decimals: 8,
        },
        Token {
            symbol: "USDC".to_string(),
            asset_id: USDC.to_string(),
            decimals: 6,
        },
        Token {
            symbol: "ETH".to_string(),
            asset_id: ETH.to_string(),
            decimals: 9,
        },
    ];
    Arc::new(SymbolCatalog::from_tokens("SPARK", &tokens).expect("valid test catalog"))
}

/// BTC bought with USDC at `price`, `btc` whole coins, stored BTC-first
pub fn btc_usdc_trade(timestamp: i64, btc: i64, price: i64) -> Trade {
    Trade::new(
        BTC,
        Decimal::from(btc) * Decimal::from(100_000_000i64),
        USDC,
        Decimal::from(btc * price) * Decimal::from(1_000_000i64),
        timestamp,
    )
}

/// Same economics as `btc_usdc_trade`, stored USDC-first
pub fn usdc_btc_trade(timestamp: i64, btc: i64, price: i64) -> Trade {
    let t = btc_usdc_trade(timestamp, btc, price);
    Trade::new(t.asset1, t.amount1, t.asset0, t.amount0, timestamp)
}

pub fn memory_store(trades: Vec<Trade>) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_trades(trades))
}
