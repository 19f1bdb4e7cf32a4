use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use watchledger_server::{api::app_router, build_state, config::Config};

fn test_config(db_path: &str) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: db_path.to_string(),
        default_quote: "KRW".to_string(),
        scheduler_enabled: false,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
    }
}

async fn test_app() -> (TempDir, Router) {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");
    let config = test_config(db_path.to_str().unwrap());
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_works() {
    let (_tmp, app) = test_app().await;

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn manual_rate_shows_up_in_the_latest_map() {
    let (_tmp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/rates",
            json!({ "base": "usd", "rate": "1391.25" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let added = body_json(response).await;
    assert_eq!(added["base"], "USD");
    assert_eq!(added["quote"], "KRW");
    assert_eq!(added["rate"], "1391.25");
    assert_eq!(added["source"], "manual");

    // Repeated base keys are all honored; EUR has no snapshot and is absent.
    let response = app
        .oneshot(get("/api/rates/latest?base=USD&base=EUR"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["quote"], "KRW");
    assert_eq!(body["rates"], json!({ "USD": "1391.25" }));
}

#[tokio::test]
async fn malformed_query_string_is_a_bad_request() {
    let (_tmp, app) = test_app().await;

    // Broken percent-encoding must not silently fall back to defaults.
    let response = app
        .oneshot(get("/api/rates/latest?base=%zz"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn invalid_quote_currency_is_a_bad_request() {
    let (_tmp, app) = test_app().await;

    let response = app
        .oneshot(get("/api/rates/latest?quote=DOLLARS"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn transactions_round_trip_with_conversion() {
    let (_tmp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/countries",
            json!({ "name_en": "Switzerland", "iso2": "CH", "default_currency": "CHF" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let country = body_json(response).await;
    let country_id = country["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/rates",
            json!({ "base": "CHF", "rate": "1593.4" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/transactions",
            json!({
                "transaction_type": "sell",
                "year": 2024,
                "country_id": country_id,
                "price": "12500"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let tx = body_json(response).await;
    assert_eq!(tx["currency"], "CHF");
    let tx_id = tx["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/transactions/{}?convert=KRW", tx_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let decorated = body_json(response).await;
    assert_eq!(decorated["price_converted"], "19917500.00");
    assert_eq!(decorated["applied_rate"], "1593.4");
    assert_eq!(decorated["convert_quote"], "KRW");

    let response = app
        .oneshot(get("/api/transactions?convert=KRW"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let page = body_json(response).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["price_converted"], "19917500.00");
}

#[tokio::test]
async fn listing_without_convert_adds_no_keys() {
    let (_tmp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/countries",
            json!({ "name_en": "South Korea", "iso2": "KR", "default_currency": "KRW" }),
        ))
        .await
        .unwrap();
    let country = body_json(response).await;
    let country_id = country["id"].as_i64().unwrap();

    app.clone()
        .oneshot(post_json(
            "/api/transactions",
            json!({
                "transaction_type": "buy",
                "year": 2023,
                "country_id": country_id,
                "price_min": "1000000",
                "price_max": "2000000"
            }),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/transactions")).await.unwrap();
    assert_eq!(response.status(), 200);
    let page = body_json(response).await;
    let record = &page["results"][0];
    assert!(record.get("price_min_converted").is_none());
    assert!(record.get("convert_quote").is_none());
}

#[tokio::test]
async fn missing_transaction_is_not_found() {
    let (_tmp, app) = test_app().await;

    let response = app.oneshot(get("/api/transactions/9999")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body = body_json(response).await;
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn sell_without_price_is_rejected() {
    let (_tmp, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/countries",
            json!({ "name_en": "Japan", "iso2": "JP", "default_currency": "JPY" }),
        ))
        .await
        .unwrap();
    let country = body_json(response).await;
    let country_id = country["id"].as_i64().unwrap();

    let response = app
        .oneshot(post_json(
            "/api/transactions",
            json!({
                "transaction_type": "sell",
                "year": 2024,
                "country_id": country_id
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
