use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use skilltrack_core::aggregation::{LeaderboardRow, LeaderboardWindow};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query params for `GET /leaderboards/{skill}`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// `all_time`, `month`, `week` (default) or `today`.
    pub window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub skill: String,
    pub window: LeaderboardWindow,
    pub rows: Vec<LeaderboardRow>,
}

/// GET /leaderboards/{skill}?window=...
pub async fn skill_leaderboard(
    State(state): State<AppState>,
    Path(skill): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<impl IntoResponse> {
    let window = match query.window.as_deref() {
        Some(value) => LeaderboardWindow::parse(value)?,
        None => LeaderboardWindow::default(),
    };
    let rows = state.stats.leaderboard(&skill, window, Utc::now()).await?;
    Ok(Json(DataResponse {
        data: LeaderboardResponse {
            skill: skill.trim().to_ascii_lowercase(),
            window,
            rows,
        },
    }))
}
