use axum::routing::get;
use axum::Router;

use crate::handlers::leaderboards;
use crate::state::AppState;

/// Leaderboard routes mounted at `/leaderboards`.
///
/// ```text
/// GET  /{skill}   -> skill_leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{skill}", get(leaderboards::skill_leaderboard))
}
