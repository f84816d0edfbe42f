//! Postgres-backed snapshot and cache stores.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use skilltrack_core::profile::{Profile, Snapshot};
use skilltrack_core::types::{DbId, Timestamp};
use skilltrack_db::models::player::Player;
use skilltrack_db::repositories::{CacheRepo, PlayerRepo, SnapshotRepo};
use skilltrack_db::DbPool;

use crate::error::StoreError;
use crate::store::{CacheStore, SnapshotStore};

/// [`SnapshotStore`] over the `players` and `snapshots` tables.
#[derive(Clone)]
pub struct PgSnapshotStore {
    pool: DbPool,
}

impl PgSnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn record_snapshot(
        &self,
        handle: &str,
        profile: &Profile,
        captured_at: Timestamp,
    ) -> Result<Player, StoreError> {
        let appended = SnapshotRepo::append(&self.pool, handle, profile, captured_at).await?;
        Ok(appended.player)
    }

    async fn find_player(&self, handle: &str) -> Result<Option<Player>, StoreError> {
        Ok(PlayerRepo::find_by_handle(&self.pool, handle).await?)
    }

    async fn latest_snapshot(
        &self,
        player_id: DbId,
        before: Option<Timestamp>,
    ) -> Result<Option<Snapshot>, StoreError> {
        Ok(SnapshotRepo::latest_for_player(&self.pool, player_id, before).await?)
    }

    async fn snapshots_for_player(
        &self,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        Ok(SnapshotRepo::list_for_player(&self.pool, player_id, since, until, None).await?)
    }

    async fn snapshots_between(
        &self,
        since: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<Vec<Snapshot>, StoreError> {
        Ok(SnapshotRepo::list_all_between(&self.pool, since, until).await?)
    }

    async fn recently_fetched(
        &self,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<Player>, StoreError> {
        Ok(PlayerRepo::list_recently_fetched(&self.pool, since, limit).await?)
    }
}

/// [`CacheStore`] over the `cache_entries` table.
#[derive(Clone)]
pub struct PgCacheStore {
    pool: DbPool,
}

impl PgCacheStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(CacheRepo::get(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let expires_at = ttl.and_then(|ttl| TimeDelta::from_std(ttl).ok().map(|d| Utc::now() + d));
        Ok(CacheRepo::set(&self.pool, key, value, expires_at).await?)
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        Ok(CacheRepo::delete_expired(&self.pool).await?)
    }
}
