use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use watchledger_core::fx::{ExchangeRate, FetchRatesSummary};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct LatestRatesResponse {
    quote: String,
    rates: BTreeMap<String, Decimal>,
}

/// Latest snapshot per base against the quote currency.
///
/// The query is parsed manually so repeated `base` keys
/// (`?base=USD&base=EUR`) all count; with no `base` keys every known base
/// for the quote is returned.
async fn get_latest_rates(
    State(state): State<Arc<AppState>>,
    raw: RawQuery,
) -> ApiResult<Json<LatestRatesResponse>> {
    let mut quote = state.default_quote.clone();
    let mut bases: Vec<String> = Vec::new();
    if let Some(qs) = raw.0 {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&qs)
            .map_err(|e| ApiError::BadRequest(format!("invalid query string: {}", e)))?;
        for (k, v) in pairs {
            match k.as_str() {
                "quote" => quote = v,
                "base" | "base[]" => bases.push(v),
                _ => {}
            }
        }
    }

    let map = state.fx_service.latest_rates_map(&quote, &bases)?;
    Ok(Json(LatestRatesResponse {
        quote: map.quote,
        rates: map.rates,
    }))
}

#[derive(Deserialize)]
struct FetchRatesBody {
    date: Option<NaiveDate>,
    quote: Option<String>,
    bases: Option<Vec<String>>,
}

async fn fetch_rates(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FetchRatesBody>,
) -> ApiResult<Json<FetchRatesSummary>> {
    let quote = body.quote.unwrap_or_else(|| state.default_quote.clone());
    let summary = state
        .fx_service
        .fetch_rates(body.date, &quote, body.bases)
        .await?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
struct NewRateBody {
    base: String,
    quote: Option<String>,
    date: Option<NaiveDate>,
    rate: Decimal,
}

async fn add_rate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewRateBody>,
) -> ApiResult<Json<ExchangeRate>> {
    let quote = body.quote.unwrap_or_else(|| state.default_quote.clone());
    let added = state
        .fx_service
        .add_manual_rate(&body.base, &quote, body.date, body.rate)
        .await?;
    Ok(Json(added))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rates/latest", get(get_latest_rates))
        .route("/rates/fetch", post(fetch_rates))
        .route("/rates", post(add_rate))
}
