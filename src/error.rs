//! Error taxonomy shared by the chart services, jobs and handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid resolution: '{resolution}'")]
    InvalidResolution { resolution: String },

    #[error("Symbol not found: '{symbol}'")]
    SymbolNotFound { symbol: String },

    #[error("No trades available for {symbol}")]
    NoTradesAvailable { symbol: String },

    #[error("Persistence failure during {operation}: {source}")]
    PersistenceFailure {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ChartError {
    pub fn persistence(operation: &'static str, source: impl Into<BoxError>) -> Self {
        ChartError::PersistenceFailure {
            operation,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChartError::InvalidResolution { .. } => StatusCode::BAD_REQUEST,
            ChartError::SymbolNotFound { .. } => StatusCode::NOT_FOUND,
            ChartError::NoTradesAvailable { .. } => StatusCode::NOT_FOUND,
            ChartError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// UDF error body: `{"s": "error", "errmsg": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct UdfErrorResponse {
    pub s: &'static str,
    pub errmsg: String,
}

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Chart request failed");
        }

        let body = UdfErrorResponse {
            s: "error",
            errmsg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
