use std::sync::Arc;

use skilltrack_tracker::{CacheStore, RefreshCoordinator, SnapshotStore, StatsService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Everything is constructed in `main` and torn down there on shutdown.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: skilltrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub coordinator: Arc<RefreshCoordinator>,
    pub stats: Arc<StatsService>,
    /// Snapshot history, shared with the auto-refresh job.
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Backing store of the profile cache, purged by the auto-refresh job.
    pub cache: Arc<dyn CacheStore>,
}
