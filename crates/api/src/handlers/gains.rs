//! Handlers for views across every tracked player.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of rows in the top-gainers list.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Upper bound on the top-gainers list.
pub const MAX_TOP_LIMIT: usize = 100;

/// Query params for `GET /gains/top`.
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

/// GET /gains/daily
pub async fn daily_totals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let series = state.stats.daily_totals(Utc::now().date_naive()).await?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /gains/top?limit=N
///
/// `limit` defaults to 10 and is clamped to `1..=100`.
pub async fn top_gainers(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_LIMIT)
        .clamp(1, MAX_TOP_LIMIT);
    let rows = state.stats.top_gainers(Utc::now(), limit).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /gains/categories
pub async fn category_totals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let breakdown = state.stats.category_totals(Utc::now()).await?;
    Ok(Json(DataResponse { data: breakdown }))
}
