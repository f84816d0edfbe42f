//! Route definitions for per-player views.

use axum::routing::get;
use axum::Router;

use crate::handlers::players;
use crate::state::AppState;

/// Player routes mounted at `/players`.
///
/// ```text
/// GET  /{handle}/profile        -> get_profile
/// GET  /{handle}/gains/weekly   -> weekly_gains
/// GET  /{handle}/gains/skills   -> skill_gains
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{handle}/profile", get(players::get_profile))
        .route("/{handle}/gains/weekly", get(players::weekly_gains))
        .route("/{handle}/gains/skills", get(players::skill_gains))
}
