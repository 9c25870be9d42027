mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use udf_backend::{build_router, AppState};

use crate::common::{btc_usdc_trade, memory_store, test_catalog, usdc_btc_trade};

fn build_test_router() -> Router {
    let store = memory_store(vec![
        btc_usdc_trade(100, 1, 30_000),
        usdc_btc_trade(200, 2, 31_000),
        btc_usdc_trade(4_000, 1, 29_500),
    ]);
    build_router(AppState::new(store, test_catalog()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_root_is_alive() {
    let (status, body) = get(build_test_router(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Server is alive");
}

#[tokio::test]
async fn test_config_descriptor() {
    let (status, json) = get_json(build_test_router(), "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["supports_time"], true);
    assert_eq!(json["supports_search"], true);
    assert_eq!(json["exchanges"][0]["value"], "SPARK");
    let resolutions = json["supported_resolutions"].as_array().unwrap();
    assert_eq!(resolutions.len(), 15);
    assert_eq!(resolutions[0], "1");
    assert_eq!(resolutions[14], "1M");
}

#[tokio::test]
async fn test_time_is_unix_seconds() {
    let before = chrono::Utc::now().timestamp();
    let (status, body) = get(build_test_router(), "/time").await;
    let after = chrono::Utc::now().timestamp();

    assert_eq!(status, StatusCode::OK);
    let time: i64 = String::from_utf8(body).unwrap().parse().unwrap();
    assert!(before <= time && time <= after);
}

#[tokio::test]
async fn test_symbols_lists_catalog() {
    let (status, json) = get_json(build_test_router(), "/symbols").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_symbols_resolves_single_symbol() {
    let (status, json) = get_json(build_test_router(), "/symbols?symbol=SPARK:BTC/USDC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "BTC/USDC");
    assert_eq!(json["currency_code"], "USDC");
    assert_eq!(json["type"], "crypto");
}

#[tokio::test]
async fn test_symbols_unknown_is_404() {
    let (status, json) = get_json(build_test_router(), "/symbols?symbol=DOGE/USDC").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["s"], "error");
}

#[tokio::test]
async fn test_history_ok() {
    let (status, json) = get_json(
        build_test_router(),
        "/history?symbol=BTC/USDC&resolution=30&from=0&to=9000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["s"], "ok");
    assert_eq!(json["t"], serde_json::json!([100, 9000]));
    assert_eq!(json["o"], serde_json::json!([30000.0, 29500.0]));
    assert_eq!(json["h"], serde_json::json!([31000.0, 29500.0]));
    assert_eq!(json["l"], serde_json::json!([30000.0, 29500.0]));
    assert_eq!(json["c"], serde_json::json!([31000.0, 29500.0]));
    assert_eq!(json["v"], serde_json::json!([3.0, 1.0]));
}

#[tokio::test]
async fn test_history_before_first_trade_is_no_data() {
    let (status, json) = get_json(
        build_test_router(),
        "/history?symbol=BTC/USDC&resolution=D&from=0&to=50",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["s"], "no_data");
    for key in ["t", "o", "h", "l", "c", "v"] {
        assert!(json[key].as_array().unwrap().is_empty(), "{key}");
    }
}

#[tokio::test]
async fn test_history_invalid_resolution_is_400() {
    let (status, json) = get_json(
        build_test_router(),
        "/history?symbol=BTC/USDC&resolution=7&from=0&to=9000",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["s"], "error");
    assert!(json["errmsg"].as_str().unwrap().contains("Invalid resolution"));
}

#[tokio::test]
async fn test_history_unknown_symbol_is_404() {
    let (status, _) = get(
        build_test_router(),
        "/history?symbol=DOGE/USDC&resolution=30&from=0&to=9000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_missing_params_is_rejected() {
    let (status, _) = get(build_test_router(), "/history?symbol=BTC/USDC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
