//! Integration tests for the per-player routes.

mod common;

use axum::http::StatusCode;
use chrono::{TimeDelta, Utc};
use common::{body_json, build_test_app, get, profile, StaticFetcher};
use skilltrack_tracker::SnapshotStore;

#[tokio::test]
async fn profile_is_fetched_and_wrapped_in_envelope() {
    let app = build_test_app(StaticFetcher::returning(profile("Zezima", 1_000, 500)));

    let response = get(app.router, "/api/v1/players/Zezima/profile").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["handle"], "zezima");
    assert_eq!(json["data"]["freshness"], "fresh");
    assert_eq!(json["data"]["profile"]["total_xp"], 1_500);
    assert_eq!(json["data"]["profile"]["skills"][1]["skill"], "mining");
    assert_eq!(app.snapshots.snapshot_count().await, 1);
}

#[tokio::test]
async fn second_manual_refresh_is_served_from_cache() {
    let app = build_test_app(StaticFetcher::returning(profile("Zezima", 1_000, 0)));

    let first = get(app.router.clone(), "/api/v1/players/zezima/profile?refresh=true").await;
    let second = get(app.router, "/api/v1/players/zezima/profile?refresh=true").await;

    assert_eq!(body_json(first).await["data"]["freshness"], "fresh");
    assert_eq!(body_json(second).await["data"]["freshness"], "cached");
    assert_eq!(app.fetcher.calls(), 1);
}

#[tokio::test]
async fn unknown_player_is_404() {
    let app = build_test_app(StaticFetcher::default());

    let response = get(app.router, "/api/v1/players/nobody/profile").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Player 'nobody' not found");
}

#[tokio::test]
async fn invalid_handle_is_400() {
    let app = build_test_app(StaticFetcher::default());

    let response = get(app.router, "/api/v1/players/thirteenchars/profile").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(app.fetcher.calls(), 0);
}

#[tokio::test]
async fn weekly_gains_has_seven_points() {
    let app = build_test_app(StaticFetcher::default());
    let now = Utc::now();
    app.snapshots
        .record_snapshot("zezima", &profile("Zezima", 100, 0), now - TimeDelta::minutes(2))
        .await
        .unwrap();
    app.snapshots
        .record_snapshot("zezima", &profile("Zezima", 400, 0), now - TimeDelta::minutes(1))
        .await
        .unwrap();

    let response = get(app.router, "/api/v1/players/zezima/gains/weekly").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let points = json["data"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|p| p["value"].as_i64().unwrap() >= 0));
}

#[tokio::test]
async fn skill_gains_for_unknown_player_is_404() {
    let app = build_test_app(StaticFetcher::default());

    let response = get(app.router, "/api/v1/players/nobody/gains/skills").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Player 'nobody' not found");
}

#[tokio::test]
async fn skill_gains_lists_recent_deltas() {
    let app = build_test_app(StaticFetcher::default());
    let now = Utc::now();
    app.snapshots
        .record_snapshot("zezima", &profile("Zezima", 100, 0), now - TimeDelta::hours(3))
        .await
        .unwrap();
    app.snapshots
        .record_snapshot("zezima", &profile("Zezima", 400, 50), now - TimeDelta::hours(1))
        .await
        .unwrap();

    let response = get(app.router, "/api/v1/players/zezima/gains/skills").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["skill"], "attack");
    assert_eq!(json["data"][0]["xp_gain"], 300);
    assert_eq!(json["data"][1]["xp_gain"], 50);
}
