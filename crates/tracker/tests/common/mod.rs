#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use skilltrack_core::normalizer::NormalizeError;
use skilltrack_core::profile::{Profile, SkillStat};
use skilltrack_core::profile::Snapshot;
use skilltrack_core::types::{DbId, Timestamp, Xp};
use skilltrack_db::models::player::Player;
use skilltrack_tracker::memory::{MemoryCacheStore, MemorySnapshotStore};
use skilltrack_tracker::{
    FetchError, ProfileCache, ProfileFetcher, RefreshCoordinator, RefreshPolicy, SnapshotStore,
    StatsService, StoreError,
};

/// A profile source that replays queued results, then reports `NO_PROFILE`.
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<Profile, FetchError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_ok(&self, profile: Profile) {
        self.script.lock().unwrap().push_back(Ok(profile));
    }

    pub fn push_err(&self, err: FetchError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for ScriptedFetcher {
    async fn fetch_profile(&self, _handle: &str) -> Result<Profile, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or(Err(FetchError::Normalize(NormalizeError::NoProfile)))
    }
}

/// A memory snapshot store whose appends can be switched to fail.
#[derive(Default)]
pub struct FailingAppendStore {
    pub inner: MemorySnapshotStore,
    failing: AtomicBool,
}

impl FailingAppendStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStore for FailingAppendStore {
    async fn record_snapshot(
        &self,
        handle: &str,
        profile: &Profile,
        captured_at: Timestamp,
    ) -> Result<Player, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.record_snapshot(handle, profile, captured_at).await
    }

    async fn find_player(&self, handle: &str) -> Result<Option<Player>, StoreError> {
        self.inner.find_player(handle).await
    }

    async fn latest_snapshot(
        &self,
        player_id: DbId,
        before: Option<Timestamp>,
    ) -> Result<Option<Snapshot>, StoreError> {
        self.inner.latest_snapshot(player_id, before).await
    }

    async fn snapshots_for_player(
        &self,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        self.inner.snapshots_for_player(player_id, since, until).await
    }

    async fn snapshots_between(
        &self,
        since: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<Vec<Snapshot>, StoreError> {
        self.inner.snapshots_between(since, until).await
    }

    async fn recently_fetched(
        &self,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<Player>, StoreError> {
        self.inner.recently_fetched(since, limit).await
    }
}

pub struct Harness {
    pub coordinator: RefreshCoordinator,
    pub stats: StatsService,
    pub fetcher: Arc<ScriptedFetcher>,
    pub store: Arc<MemorySnapshotStore>,
    pub cache: ProfileCache,
}

pub fn harness() -> Harness {
    harness_with(ScriptedFetcher::new())
}

pub fn harness_with(fetcher: ScriptedFetcher) -> Harness {
    let fetcher = Arc::new(fetcher);
    let store = Arc::new(MemorySnapshotStore::new());
    let cache = ProfileCache::new(Arc::new(MemoryCacheStore::new()), None);
    let coordinator = RefreshCoordinator::new(
        fetcher.clone(),
        store.clone(),
        cache.clone(),
        RefreshPolicy::default(),
    );
    let stats = StatsService::new(store.clone());
    Harness {
        coordinator,
        stats,
        fetcher,
        store,
        cache,
    }
}

/// `2026-10-day hh:mm:ss UTC`.
pub fn at(day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 10, day, hour, min, sec).unwrap()
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
