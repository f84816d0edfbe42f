//! Periodic refresh of recently active players.
//!
//! On every tick, players fetched within the last week go through the
//! ordinary (non-manual) refresh path, so the freshness window still
//! applies. Fetches run with bounded concurrency. Expired cache rows are
//! purged on the same tick. Failures are logged and never stop the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use skilltrack_tracker::{CacheStore, Freshness, RefreshCoordinator, SnapshotStore};
use tokio_util::sync::CancellationToken;

/// Players fetched within this many days are refreshed.
const ACTIVE_WINDOW_DAYS: i64 = 7;

/// Upper bound on players refreshed per tick.
const MAX_PLAYERS_PER_TICK: i64 = 1_000;

/// Counters for one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub refreshed: usize,
    pub cached: usize,
    pub failed: usize,
    pub purged: u64,
}

/// Run the auto-refresh loop until `cancel` is triggered.
pub async fn run(
    coordinator: Arc<RefreshCoordinator>,
    snapshots: Arc<dyn SnapshotStore>,
    cache: Arc<dyn CacheStore>,
    every: Duration,
    concurrency: usize,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = every.as_secs(),
        concurrency,
        "Auto-refresh job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Auto-refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                let summary = tick(
                    Arc::clone(&coordinator),
                    snapshots.as_ref(),
                    cache.as_ref(),
                    concurrency,
                )
                .await;
                tracing::info!(
                    refreshed = summary.refreshed,
                    cached = summary.cached,
                    failed = summary.failed,
                    purged = summary.purged,
                    "Auto-refresh tick complete"
                );
            }
        }
    }
}

/// One pass: refresh active players, then purge expired cache entries.
pub async fn tick(
    coordinator: Arc<RefreshCoordinator>,
    snapshots: &dyn SnapshotStore,
    cache: &dyn CacheStore,
    concurrency: usize,
) -> TickSummary {
    let mut summary = TickSummary::default();

    let since = Utc::now() - TimeDelta::days(ACTIVE_WINDOW_DAYS);
    match snapshots.recently_fetched(since, MAX_PLAYERS_PER_TICK).await {
        Ok(players) => {
            let results: Vec<_> = stream::iter(players)
                .map(|player| {
                    let coordinator = Arc::clone(&coordinator);
                    async move {
                        let result = coordinator.refresh(&player.handle, false).await;
                        (player.handle, result)
                    }
                })
                .buffer_unordered(concurrency.max(1))
                .collect()
                .await;

            for (handle, result) in results {
                match result {
                    Ok(outcome) => match outcome.freshness {
                        Freshness::Fresh => summary.refreshed += 1,
                        Freshness::Cached => summary.cached += 1,
                        Freshness::Stale => summary.failed += 1,
                    },
                    Err(e) => {
                        tracing::warn!(player = %handle, error = %e, "Auto-refresh failed");
                        summary.failed += 1;
                    }
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Auto-refresh: could not list active players");
        }
    }

    match cache.purge_expired().await {
        Ok(purged) => summary.purged = purged,
        Err(e) => tracing::error!(error = %e, "Auto-refresh: cache purge failed"),
    }

    summary
}
