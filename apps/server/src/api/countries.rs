use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use watchledger_core::countries::{Country, NewCountry};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn create_country(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewCountry>,
) -> ApiResult<Json<Country>> {
    let added = state.country_repository.add_country(new).await?;
    Ok(Json(added))
}

async fn get_country(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Country>> {
    let country = state
        .country_repository
        .get_country(id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(country))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/countries", post(create_country))
        .route("/countries/{id}", get(get_country))
}
