//! Route definitions for cross-player gain views.

use axum::routing::get;
use axum::Router;

use crate::handlers::gains;
use crate::state::AppState;

/// Gain routes mounted at `/gains`.
///
/// ```text
/// GET  /daily        -> daily_totals
/// GET  /top          -> top_gainers
/// GET  /categories   -> category_totals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/daily", get(gains::daily_totals))
        .route("/top", get(gains::top_gainers))
        .route("/categories", get(gains::category_totals))
}
