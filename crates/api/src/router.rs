//! The full HTTP app: routes, JSON fallback and middleware.
//!
//! `main.rs` and the integration tests both build the app here.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// `/health` at the root, everything else under `/api/v1`.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .fallback(unknown_route)
        .with_state(state);

    with_middleware(app, config)
}

/// Outermost first: CORS, request id, tracing, timeout, panic recovery.
fn with_middleware(app: Router, config: &ServerConfig) -> Router {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    app.layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(trace)
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(build_cors_layer(config))
}

/// Unknown paths get the same `{error, code}` body as handler errors.
async fn unknown_route(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("No route for '{}'", uri.path()),
            "code": "NOT_FOUND",
        })),
    )
}

/// The API is read-only, so only `GET` (and preflight) are allowed.
///
/// Panics on an unparseable origin; called once at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
