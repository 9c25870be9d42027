// src/lib.rs

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use models::symbol::SymbolCatalog;
use services::{history::HistoryService, store::ChartStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SymbolCatalog>,
    pub history: HistoryService,
}

impl AppState {
    pub fn new(store: Arc<dyn ChartStore>, catalog: Arc<SymbolCatalog>) -> Self {
        Self {
            history: HistoryService::new(store, catalog.clone()),
            catalog,
        }
    }
}

pub mod config;
pub mod error;
pub mod jobs;

pub mod entities {
    pub mod prelude;
    pub mod candles;
    pub mod trades;
}

pub mod models {
    pub mod candle;
    pub mod period;
    pub mod symbol;
    pub mod trade;
    pub mod udf;
}

pub mod services {
    pub mod bucketing;
    pub mod chart_sync;
    pub mod history;
    pub mod price_normalizer;
    pub mod store;
}

pub mod handlers {
    pub mod udf;
}

/// Datafeed router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::udf::get_root))
        .route("/config", get(handlers::udf::get_config))
        .route("/symbols", get(handlers::udf::get_symbols))
        .route("/time", get(handlers::udf::get_time))
        .route("/history", get(handlers::udf::get_history))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
