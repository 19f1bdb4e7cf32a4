use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use watchledger_core::errors::Error as CoreError;
use watchledger_core::transactions::{
    decorate_page, decorate_record, NewWatchTransaction, WatchTransaction,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Deserialize)]
struct ListQuery {
    convert: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Serialize)]
struct TransactionPage {
    count: usize,
    results: Vec<Value>,
}

/// Lists transactions newest first, optionally decorated with converted
/// prices when `convert` names a target currency.
async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<TransactionPage>> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = q.offset.unwrap_or(0).max(0);

    let rows = state.transaction_repository.list_transactions(limit, offset)?;
    let mut items = rows
        .into_iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(CoreError::from)?;

    if let Some(quote) = q.convert.as_deref() {
        decorate_page(&mut items, quote, &state.rates_cache)?;
    }

    Ok(Json(TransactionPage {
        count: items.len(),
        results: items,
    }))
}

#[derive(Deserialize)]
struct ConvertQuery {
    convert: Option<String>,
}

async fn get_transaction(
    Path(id): Path<i32>,
    Query(q): Query<ConvertQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let tx = state
        .transaction_repository
        .get_transaction(id)?
        .ok_or(ApiError::NotFound)?;
    let mut item = serde_json::to_value(tx).map_err(CoreError::from)?;

    if let Some(quote) = q.convert.as_deref() {
        decorate_record(&mut item, quote, &state.rates_cache)?;
    }

    Ok(Json(item))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewWatchTransaction>,
) -> ApiResult<Json<WatchTransaction>> {
    let added = state.transaction_repository.add_transaction(new).await?;
    Ok(Json(added))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/{id}", get(get_transaction))
}
