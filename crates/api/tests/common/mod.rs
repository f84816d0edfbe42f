#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use skilltrack_api::config::{CacheBackend, ServerConfig};
use skilltrack_api::router::build_app_router;
use skilltrack_api::state::AppState;
use skilltrack_core::normalizer::NormalizeError;
use skilltrack_core::profile::{Profile, SkillStat};
use skilltrack_core::types::Xp;
use skilltrack_tracker::memory::{MemoryCacheStore, MemorySnapshotStore};
use skilltrack_tracker::{
    FetchError, ProfileCache, ProfileFetcher, RefreshCoordinator, StatsService,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

/// Profile source that always answers with the same profile, or with
/// `NO_PROFILE` when it has none.
#[derive(Default)]
pub struct StaticFetcher {
    profile: Option<Profile>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn returning(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for StaticFetcher {
    async fn fetch_profile(&self, _handle: &str) -> Result<Profile, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or(FetchError::Normalize(NormalizeError::NoProfile))
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cache_backend: CacheBackend::Memory,
        ..ServerConfig::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub snapshots: Arc<MemorySnapshotStore>,
    pub fetcher: Arc<StaticFetcher>,
}

/// Build the full application with in-memory stores and a database pool
/// that points at nothing, so `/health` reports `degraded`.
pub fn build_test_app(fetcher: StaticFetcher) -> TestApp {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://skilltrack@127.0.0.1:1/skilltrack")
        .expect("valid database url");

    let fetcher = Arc::new(fetcher);
    let snapshots = Arc::new(MemorySnapshotStore::new());
    let cache = Arc::new(MemoryCacheStore::new());
    let coordinator = RefreshCoordinator::new(
        fetcher.clone(),
        snapshots.clone(),
        ProfileCache::new(cache.clone(), None),
        config.refresh_policy(),
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        coordinator: Arc::new(coordinator),
        stats: Arc::new(StatsService::new(snapshots.clone())),
        snapshots: snapshots.clone(),
        cache,
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        snapshots,
        fetcher,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn profile(name: &str, attack_xp: Xp, mining_xp: Xp) -> Profile {
    let stat = |skill: &str, xp: Xp| SkillStat {
        skill: skill.to_string(),
        level: 50,
        real_level: 50,
        virtual_level: 50,
        xp,
        rank: None,
    };
    Profile {
        name: name.to_string(),
        rank: 1,
        total_xp: attack_xp + mining_xp,
        total_level: 100,
        combat_level: 40,
        logged_in: false,
        quests_complete: 0,
        quests_started: 0,
        quests_not_started: 0,
        skills: vec![stat("attack", attack_xp), stat("mining", mining_xp)],
        activities: Vec::new(),
    }
}
