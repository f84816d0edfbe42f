//! Tests for one auto-refresh tick over in-memory stores.

mod common;

use chrono::{TimeDelta, Utc};
use common::{build_test_app, profile, StaticFetcher};
use skilltrack_api::background::auto_refresh::{tick, TickSummary};
use skilltrack_tracker::SnapshotStore;

#[tokio::test]
async fn refreshes_active_players_then_respects_freshness_window() {
    let app = build_test_app(StaticFetcher::returning(profile("Alpha", 2_000, 0)));
    let now = Utc::now();
    app.snapshots
        .record_snapshot("alpha", &profile("Alpha", 1_000, 0), now - TimeDelta::days(1))
        .await
        .unwrap();
    app.snapshots
        .record_snapshot("dormant", &profile("Dormant", 1_000, 0), now - TimeDelta::days(30))
        .await
        .unwrap();

    let first = tick(
        app.state.coordinator.clone(),
        app.state.snapshots.as_ref(),
        app.state.cache.as_ref(),
        2,
    )
    .await;
    let second = tick(
        app.state.coordinator.clone(),
        app.state.snapshots.as_ref(),
        app.state.cache.as_ref(),
        2,
    )
    .await;

    assert_eq!(
        first,
        TickSummary {
            refreshed: 1,
            ..TickSummary::default()
        }
    );
    assert_eq!(
        second,
        TickSummary {
            cached: 1,
            ..TickSummary::default()
        }
    );
    assert_eq!(app.fetcher.calls(), 1);
    assert_eq!(app.snapshots.snapshot_count().await, 3);
}

#[tokio::test]
async fn failed_refresh_with_history_counts_as_failed() {
    let app = build_test_app(StaticFetcher::default());
    app.snapshots
        .record_snapshot(
            "alpha",
            &profile("Alpha", 1_000, 0),
            Utc::now() - TimeDelta::hours(2),
        )
        .await
        .unwrap();

    let summary = tick(
        app.state.coordinator.clone(),
        app.state.snapshots.as_ref(),
        app.state.cache.as_ref(),
        1,
    )
    .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(app.snapshots.snapshot_count().await, 1);
}
