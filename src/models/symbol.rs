//! Static symbol catalog
//!
//! Built once at startup from the token list and shared read-only
//! through `AppState`.

use serde::{Deserialize, Serialize};

use crate::error::{BoxError, ChartError};
use crate::models::period::SUPPORTED_RESOLUTIONS;

/// Largest scale `rust_decimal` can represent
pub const MAX_TOKEN_DECIMALS: u32 = 28;

pub const DEFAULT_EXCHANGE: &str = "SPARK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub asset_id: String,
    pub decimals: u32,
}

/// The two assets of a symbol, base first.
///
/// Price is quoted as quote-asset units per base-asset unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPair {
    pub base_asset: String,
    pub quote_asset: String,
    pub base_decimals: u32,
    pub quote_decimals: u32,
}

/// UDF symbol descriptor
#[derive(Debug, Clone, Serialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub ticker: String,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub currency_code: String,
    pub exchange: String,
    pub listed_exchange: String,
    #[serde(rename = "type")]
    pub symbol_type: &'static str,
    pub session: &'static str,
    pub timezone: &'static str,
    pub minmov: u32,
    pub minmov2: u32,
    pub pricescale: u64,
    pub supported_resolutions: Vec<&'static str>,
    pub has_intraday: bool,
    pub has_daily: bool,
    pub has_weekly_and_monthly: bool,
    pub data_status: &'static str,
    #[serde(skip)]
    pub pair: AssetPair,
}

#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    exchange: String,
    symbols: Vec<SymbolInfo>,
}

impl SymbolCatalog {
    /// Build every ordered pair `BASE/QUOTE` out of `tokens`
    pub fn from_tokens(exchange: &str, tokens: &[Token]) -> Result<Self, BoxError> {
        if let Some(token) = tokens.iter().find(|t| t.decimals > MAX_TOKEN_DECIMALS) {
            return Err(format!(
                "Token {} has {} decimals, maximum supported is {}",
                token.symbol, token.decimals, MAX_TOKEN_DECIMALS
            )
            .into());
        }

        let mut symbols = Vec::with_capacity(tokens.len() * tokens.len().saturating_sub(1));
        for base in tokens {
            for quote in tokens.iter().filter(|q| q.symbol != base.symbol) {
                symbols.push(symbol_info(exchange, base, quote));
            }
        }

        Ok(Self {
            exchange: exchange.to_string(),
            symbols,
        })
    }

    /// Parse a JSON token list (`[{"symbol", "asset_id", "decimals"}]`)
    pub fn from_json(exchange: &str, json: &str) -> Result<Self, BoxError> {
        let tokens: Vec<Token> = serde_json::from_str(json)?;
        Self::from_tokens(exchange, &tokens)
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.symbols
    }

    /// Exact lookup by catalog symbol
    pub fn get(&self, symbol: &str) -> Result<&SymbolInfo, ChartError> {
        self.symbols
            .iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| ChartError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    /// Lenient lookup: accepts "EXCHANGE:BASE/QUOTE" and any letter case
    pub fn resolve(&self, input: &str) -> Result<&SymbolInfo, ChartError> {
        let name = input.rsplit_once(':').map_or(input, |(_, s)| s);
        self.get(&name.to_uppercase()).map_err(|_| ChartError::SymbolNotFound {
            symbol: input.to_string(),
        })
    }
}

fn symbol_info(exchange: &str, base: &Token, quote: &Token) -> SymbolInfo {
    let symbol = format!("{}/{}", base.symbol, quote.symbol);
    SymbolInfo {
        ticker: symbol.clone(),
        name: symbol.clone(),
        full_name: symbol.clone(),
        description: format!("{} / {}", base.symbol, quote.symbol),
        currency_code: quote.symbol.clone(),
        exchange: exchange.to_string(),
        listed_exchange: exchange.to_string(),
        symbol_type: "crypto",
        session: "24x7",
        timezone: "Etc/UTC",
        minmov: 1,
        minmov2: 0,
        pricescale: 10u64.pow(quote.decimals.min(8)),
        supported_resolutions: SUPPORTED_RESOLUTIONS.to_vec(),
        has_intraday: true,
        has_daily: true,
        has_weekly_and_monthly: true,
        data_status: "streaming",
        pair: AssetPair {
            base_asset: base.asset_id.clone(),
            quote_asset: quote.asset_id.clone(),
            base_decimals: base.decimals,
            quote_decimals: quote.decimals,
        },
        symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token {
                symbol: "BTC".to_string(),
                asset_id: "0xbtc".to_string(),
                decimals: 8,
            },
            Token {
                symbol: "USDC".to_string(),
                asset_id: "0xusdc".to_string(),
                decimals: 6,
            },
            Token {
                symbol: "ETH".to_string(),
                asset_id: "0xeth".to_string(),
                decimals: 9,
            },
        ]
    }

    #[test]
    fn test_catalog_builds_ordered_pairs() {
        let catalog = SymbolCatalog::from_tokens("SPARK", &tokens()).unwrap();
        assert_eq!(catalog.symbols().len(), 6);
        assert!(catalog.get("BTC/USDC").is_ok());
        assert!(catalog.get("USDC/BTC").is_ok());
        assert!(catalog.get("BTC/BTC").is_err());
    }

    #[test]
    fn test_pair_orientation() {
        let catalog = SymbolCatalog::from_tokens("SPARK", &tokens()).unwrap();
        let info = catalog.get("BTC/USDC").unwrap();
        assert_eq!(info.pair.base_asset, "0xbtc");
        assert_eq!(info.pair.quote_asset, "0xusdc");
        assert_eq!(info.pair.base_decimals, 8);
        assert_eq!(info.pair.quote_decimals, 6);
        assert_eq!(info.currency_code, "USDC");
        assert_eq!(info.description, "BTC / USDC");
    }

    #[test]
    fn test_resolve_strips_exchange_prefix() {
        let catalog = SymbolCatalog::from_tokens("SPARK", &tokens()).unwrap();
        assert_eq!(catalog.resolve("SPARK:btc/usdc").unwrap().symbol, "BTC/USDC");
        assert_eq!(catalog.resolve("eth/btc").unwrap().symbol, "ETH/BTC");
        match catalog.resolve("SPARK:DOGE/USDC") {
            Err(ChartError::SymbolNotFound { symbol }) => assert_eq!(symbol, "SPARK:DOGE/USDC"),
            other => panic!("unexpected: {:?}", other.map(|s| s.symbol.clone())),
        }
    }

    #[test]
    fn test_get_is_exact() {
        let catalog = SymbolCatalog::from_tokens("SPARK", &tokens()).unwrap();
        assert!(catalog.get("btc/usdc").is_err());
    }

    #[test]
    fn test_rejects_excessive_decimals() {
        let mut tokens = tokens();
        tokens[0].decimals = 30;
        assert!(SymbolCatalog::from_tokens("SPARK", &tokens).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"symbol": "BTC", "asset_id": "0x01", "decimals": 8},
            {"symbol": "USDC", "asset_id": "0x02", "decimals": 6}
        ]"#;
        let catalog = SymbolCatalog::from_json("SPARK", json).unwrap();
        assert_eq!(catalog.symbols().len(), 2);
        assert_eq!(catalog.exchange(), "SPARK");
    }

    #[test]
    fn test_symbol_info_serializes_type_field() {
        let catalog = SymbolCatalog::from_tokens("SPARK", &tokens()).unwrap();
        let json = serde_json::to_value(catalog.get("BTC/USDC").unwrap()).unwrap();
        assert_eq!(json["type"], "crypto");
        assert_eq!(json["supported_resolutions"][14], "1M");
        assert!(json.get("pair").is_none());
    }
}
