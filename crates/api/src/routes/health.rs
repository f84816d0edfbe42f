//! Liveness of each backing store.
//!
//! The cache check reads a key that is never written, so a healthy backend
//! answers `None` without touching real entries.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::config::CacheBackend;
use crate::state::AppState;

const CACHE_CHECK_KEY: &str = "health:check";

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every check passes, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub cache_backend: CacheBackend,
    pub cache_healthy: bool,
    /// Whether snapshot history can be queried.
    pub history_healthy: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = skilltrack_db::health_check(&state.pool).await.is_ok();

    let cache_healthy = match state.cache.get(CACHE_CHECK_KEY).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            false
        }
    };

    let history_healthy = match state.snapshots.recently_fetched(Utc::now(), 1).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Snapshot store health check failed");
            false
        }
    };

    let status = if db_healthy && cache_healthy && history_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_backend: state.config.cache_backend,
        cache_healthy,
        history_healthy,
    })
}

/// Root-level routes, mounted outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
