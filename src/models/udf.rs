//! UDF capability and symbol listing models

use serde::{Deserialize, Serialize};

use crate::models::period::SUPPORTED_RESOLUTIONS;

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeDescriptor {
    pub value: String,
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolTypeDescriptor {
    pub value: &'static str,
    pub name: &'static str,
}

/// Response for GET /config
#[derive(Debug, Clone, Serialize)]
pub struct UdfConfigResponse {
    pub exchanges: Vec<ExchangeDescriptor>,
    pub symbols_types: Vec<SymbolTypeDescriptor>,
    pub supported_resolutions: Vec<&'static str>,
    pub supports_search: bool,
    pub supports_group_request: bool,
    pub supports_marks: bool,
    pub supports_timescale_marks: bool,
    pub supports_time: bool,
}

impl UdfConfigResponse {
    pub fn for_exchange(exchange: &str) -> Self {
        let mut name = exchange.to_lowercase();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        Self {
            exchanges: vec![ExchangeDescriptor {
                value: exchange.to_string(),
                desc: name.clone(),
                name,
            }],
            symbols_types: vec![SymbolTypeDescriptor {
                value: "crypto",
                name: "Cryptocurrency",
            }],
            supported_resolutions: SUPPORTED_RESOLUTIONS.to_vec(),
            supports_search: true,
            supports_group_request: false,
            supports_marks: false,
            supports_timescale_marks: false,
            supports_time: true,
        }
    }
}

/// Query parameters for GET /symbols
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolsQuery {
    pub symbol: Option<String>,
}
