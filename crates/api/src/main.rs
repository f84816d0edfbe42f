use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use skilltrack_source::ProfileClient;
use skilltrack_tracker::memory::MemoryCacheStore;
use skilltrack_tracker::postgres::{PgCacheStore, PgSnapshotStore};
use skilltrack_tracker::{CacheStore, ProfileCache, RefreshCoordinator, SnapshotStore, StatsService};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skilltrack_api::background::auto_refresh;
use skilltrack_api::config::{CacheBackend, ServerConfig};
use skilltrack_api::router::build_app_router;
use skilltrack_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "skilltrack_api=debug,skilltrack_tracker=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        source = %config.profile_source_url,
        cache_backend = ?config.cache_backend,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = skilltrack_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    skilltrack_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    skilltrack_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Stores ---
    let snapshots: Arc<dyn SnapshotStore> = Arc::new(PgSnapshotStore::new(pool.clone()));
    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Postgres => Arc::new(PgCacheStore::new(pool.clone())),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
    };
    let profile_cache = ProfileCache::new(
        Arc::clone(&cache),
        Some(Duration::from_secs(config.cache_ttl_secs)),
    );

    // --- Profile source ---
    let fetch_timeout = Duration::from_secs(config.profile_fetch_timeout_secs);
    let http = reqwest::Client::builder()
        .timeout(fetch_timeout)
        .build()
        .expect("Failed to build HTTP client");
    let source = ProfileClient::with_client(http, config.profile_source_url.clone())
        .with_activity_limit(config.profile_activity_limit);

    // --- Coordinator and stats ---
    let coordinator = Arc::new(
        RefreshCoordinator::new(
            Arc::new(source),
            Arc::clone(&snapshots),
            profile_cache,
            config.refresh_policy(),
        )
        .with_fetch_timeout(fetch_timeout),
    );
    let stats = Arc::new(StatsService::new(Arc::clone(&snapshots)));

    // --- Auto-refresh ---
    let refresh_cancel = CancellationToken::new();
    let refresh_handle = tokio::spawn(auto_refresh::run(
        Arc::clone(&coordinator),
        Arc::clone(&snapshots),
        Arc::clone(&cache),
        Duration::from_secs(config.auto_refresh_interval_secs),
        config.auto_refresh_concurrency,
        refresh_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        coordinator,
        stats,
        snapshots,
        cache,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    refresh_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), refresh_handle).await;
    tracing::info!("Auto-refresh job stopped");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
