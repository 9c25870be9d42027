//! UDF datafeed handlers
//!
//! Endpoints consumed by the charting client:
//! - GET /config
//! - GET /symbols
//! - GET /time
//! - GET /history

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::error::ChartError;
use crate::models::candle::{HistoryQuery, KlinesResponse};
use crate::models::udf::{SymbolsQuery, UdfConfigResponse};
use crate::AppState;

/// GET /
pub async fn get_root() -> &'static str {
    "Server is alive"
}

/// GET /config
///
/// Static capability descriptor.
pub async fn get_config(State(state): State<AppState>) -> Json<UdfConfigResponse> {
    Json(UdfConfigResponse::for_exchange(state.catalog.exchange()))
}

/// GET /symbols
///
/// Without parameters returns the whole catalog. With `?symbol=` returns
/// the single resolved descriptor, accepting "EXCHANGE:BASE/QUOTE".
///
/// # Response
/// - 200: Symbol descriptor(s)
/// - 404: Unknown symbol
pub async fn get_symbols(
    State(state): State<AppState>,
    Query(query): Query<SymbolsQuery>,
) -> Result<Response, ChartError> {
    match query.symbol {
        Some(symbol) => {
            let info = state.catalog.resolve(&symbol)?;
            Ok(Json(info).into_response())
        }
        None => Ok(Json(state.catalog.symbols()).into_response()),
    }
}

/// GET /time
///
/// Current server time in Unix seconds, as plain text.
pub async fn get_time() -> String {
    Utc::now().timestamp().to_string()
}

/// GET /history?symbol&resolution&from&to
///
/// # Response
/// - 200: Klines, `s` is "ok" or "no_data"
/// - 400: Invalid resolution
/// - 404: Unknown symbol
/// - 500: Database error
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<KlinesResponse>, ChartError> {
    info!(
        symbol = %query.symbol,
        resolution = %query.resolution,
        from = query.from,
        to = query.to,
        "Fetching kline history"
    );

    let klines = state
        .history
        .history(&query.symbol, &query.resolution, query.from, query.to)
        .await?;

    Ok(Json(KlinesResponse::from(klines)))
}
