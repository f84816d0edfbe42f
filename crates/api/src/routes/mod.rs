pub mod gains;
pub mod health;
pub mod leaderboards;
pub mod players;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /players/{handle}/profile                        current profile (?refresh=true for manual)
/// /players/{handle}/gains/weekly                   7-day gain series
/// /players/{handle}/gains/skills                   per-skill 24h deltas
///
/// /gains/daily                                     8-day totals across players
/// /gains/top                                       top gainers (?limit=N)
/// /gains/categories                                category share of XP gained
///
/// /leaderboards/{skill}                            skill leaderboard (?window=...)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/players", players::router())
        .nest("/gains", gains::router())
        .nest("/leaderboards", leaderboards::router())
}
