//! Seams between the coordinator and its collaborators.
//!
//! Each trait is object-safe and held as `Arc<dyn ...>` so the binary can
//! pick Postgres or in-memory backends at startup and tests can script
//! the profile source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skilltrack_core::profile::{Profile, Snapshot};
use skilltrack_core::types::{DbId, Timestamp};
use skilltrack_db::models::player::Player;

use crate::error::{FetchError, StoreError};

/// Fetches and normalizes a player's current profile.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// `handle` is already normalized.
    async fn fetch_profile(&self, handle: &str) -> Result<Profile, FetchError>;
}

/// Durable, append-only snapshot history.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Append a capture for `handle` as one unit of work: find or create
    /// the player, write the snapshot with its skill and activity rows,
    /// and advance the player's last-fetch time. Returns the player.
    async fn record_snapshot(
        &self,
        handle: &str,
        profile: &Profile,
        captured_at: Timestamp,
    ) -> Result<Player, StoreError>;

    async fn find_player(&self, handle: &str) -> Result<Option<Player>, StoreError>;

    /// The player's newest snapshot, limited to captures strictly before
    /// `before` when given.
    async fn latest_snapshot(
        &self,
        player_id: DbId,
        before: Option<Timestamp>,
    ) -> Result<Option<Snapshot>, StoreError>;

    /// One player's snapshots in `[since, until]`, oldest first.
    async fn snapshots_for_player(
        &self,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<Snapshot>, StoreError>;

    /// All players' snapshots in `[since, until]`, oldest first.
    async fn snapshots_between(
        &self,
        since: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<Vec<Snapshot>, StoreError>;

    /// Players fetched at or after `since`, most recent first.
    async fn recently_fetched(&self, since: Timestamp, limit: i64)
        -> Result<Vec<Player>, StoreError>;
}

/// String key/value store with optional expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `None` for missing or expired keys.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Drop expired entries. Returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

/// Which cooldown a refresh timestamp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownKind {
    /// Any successful fetch.
    Fetch,
    /// A user-requested refresh.
    Manual,
}

impl CooldownKind {
    fn key_prefix(self) -> &'static str {
        match self {
            Self::Fetch => "refresh:fetch:",
            Self::Manual => "refresh:manual:",
        }
    }
}

const PROFILE_KEY_PREFIX: &str = "profile:";

/// Typed view of a [`CacheStore`]: one serialized profile per player plus
/// millisecond refresh timestamps per cooldown kind.
#[derive(Clone)]
pub struct ProfileCache {
    store: Arc<dyn CacheStore>,
    ttl: Option<Duration>,
}

impl ProfileCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Option<Duration>) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub async fn get_profile(&self, handle: &str) -> Result<Option<Profile>, StoreError> {
        let key = format!("{PROFILE_KEY_PREFIX}{handle}");
        match self.store.get(&key).await? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    pub async fn set_profile(&self, handle: &str, profile: &Profile) -> Result<(), StoreError> {
        let key = format!("{PROFILE_KEY_PREFIX}{handle}");
        let blob = serde_json::to_string(profile)?;
        self.store.set(&key, &blob, self.ttl).await
    }

    /// Milliseconds since the Unix epoch of the last refresh of `kind`.
    pub async fn get_timestamp(
        &self,
        handle: &str,
        kind: CooldownKind,
    ) -> Result<Option<i64>, StoreError> {
        let key = format!("{}{handle}", kind.key_prefix());
        match self.store.get(&key).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_timestamp(
        &self,
        handle: &str,
        kind: CooldownKind,
        millis: i64,
    ) -> Result<(), StoreError> {
        let key = format!("{}{handle}", kind.key_prefix());
        self.store.set(&key, &millis.to_string(), self.ttl).await
    }
}
