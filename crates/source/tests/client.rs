//! Tests for `ProfileClient` against a local stub of the profile source.

use assert_matches::assert_matches;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use skilltrack_core::normalizer::RawRank;
use skilltrack_source::{ProfileClient, SourceError};
use std::collections::HashMap;

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/runemetrics")
}

async fn echo_profile(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "name": params.get("user").cloned().unwrap_or_default(),
        "rank": "1,024",
        "totalxp": 1154,
        "loggedIn": "false",
        "skillvalues": [{ "id": 1, "level": 2, "xp": 11540, "rank": 7 }],
        "activities": [],
        "questscomplete": params.get("activities").and_then(|n| n.parse::<i32>().ok()),
    }))
}

#[tokio::test]
async fn fetches_and_decodes_raw_profile() {
    let base = serve(Router::new().route("/runemetrics/profile/profile", get(echo_profile))).await;
    let client = ProfileClient::new(base).with_activity_limit(5);

    let raw = client.fetch_profile("le me").await.unwrap();

    assert_eq!(raw.name.as_deref(), Some("le me"));
    assert_eq!(raw.rank, Some(RawRank::Text("1,024".to_string())));
    assert_eq!(raw.total_xp, Some(1154));
    assert_eq!(raw.quests_complete, Some(5));
    assert_eq!(raw.skill_values.unwrap()[0].xp, 11540);
}

#[tokio::test]
async fn source_error_body_is_returned_as_ok() {
    let app = Router::new().route(
        "/runemetrics/profile/profile",
        get(|| async { Json(json!({ "error": "NO_PROFILE", "loggedIn": "false" })) }),
    );
    let client = ProfileClient::new(serve(app).await);

    let raw = client.fetch_profile("nobody").await.unwrap();
    assert_eq!(raw.error.as_deref(), Some("NO_PROFILE"));
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let app = Router::new().route(
        "/runemetrics/profile/profile",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    );
    let client = ProfileClient::new(serve(app).await);

    let err = client.fetch_profile("zezima").await.unwrap_err();
    assert_matches!(err, SourceError::ApiError { status: 503, ref body } if body == "try later");
}

#[tokio::test]
async fn unreachable_source_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ProfileClient::new(format!("http://{addr}"));

    let err = client.fetch_profile("zezima").await.unwrap_err();
    assert_matches!(err, SourceError::Request(_));
}
