//! Handlers for per-player views: the refreshed profile and gain series.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query params for `GET /players/{handle}/profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    /// User-requested refresh, subject to the manual cooldown.
    #[serde(default)]
    pub refresh: bool,
}

/// GET /players/{handle}/profile
///
/// Returns the profile with its freshness (`fresh`, `cached` or `stale`).
pub async fn get_profile(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.coordinator.refresh(&handle, query.refresh).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /players/{handle}/gains/weekly
pub async fn weekly_gains(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let series = state.stats.weekly_gains(&handle, today).await?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /players/{handle}/gains/skills
pub async fn skill_gains(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deltas = state.stats.skill_gains(&handle, Utc::now()).await?;
    Ok(Json(DataResponse { data: deltas }))
}
