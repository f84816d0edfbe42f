//! In-process stores for single-instance deployments and tests.
//!
//! State lives behind a `tokio::sync::RwLock`; nothing survives a restart.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use skilltrack_core::profile::{Profile, Snapshot};
use skilltrack_core::types::{DbId, Timestamp};
use skilltrack_db::models::player::Player;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{CacheStore, SnapshotStore};

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

struct CacheEntry {
    value: String,
    expires_at: Option<Timestamp>,
}

impl CacheEntry {
    fn is_live(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// [`CacheStore`] backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let expires_at = ttl.and_then(|ttl| TimeDelta::from_std(ttl).ok().map(|d| Utc::now() + d));
        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        Ok((before - entries.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SnapshotState {
    players: Vec<Player>,
    /// Kept in insertion order; reads sort by capture time.
    snapshots: Vec<Snapshot>,
}

/// [`SnapshotStore`] backed by vectors.
#[derive(Default)]
pub struct MemorySnapshotStore {
    state: RwLock<SnapshotState>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots recorded so far.
    pub async fn snapshot_count(&self) -> usize {
        self.state.read().await.snapshots.len()
    }
}

/// Clone matching snapshots ordered by capture time, ties in insertion order.
fn ordered(snapshots: &[Snapshot], keep: impl Fn(&Snapshot) -> bool) -> Vec<Snapshot> {
    let mut out: Vec<Snapshot> = snapshots.iter().filter(|s| keep(*s)).cloned().collect();
    out.sort_by_key(|s| s.captured_at);
    out
}

fn in_range(ts: Timestamp, since: Option<Timestamp>, until: Option<Timestamp>) -> bool {
    since.is_none_or(|since| ts >= since) && until.is_none_or(|until| ts <= until)
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn record_snapshot(
        &self,
        handle: &str,
        profile: &Profile,
        captured_at: Timestamp,
    ) -> Result<Player, StoreError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let index = match state.players.iter().position(|p| p.handle == handle) {
            Some(index) => index,
            None => {
                let id = state.players.len() as DbId + 1;
                state.players.push(Player {
                    id,
                    handle: handle.to_string(),
                    display_name: profile.name.clone(),
                    last_fetched_at: None,
                    created_at: now,
                    updated_at: now,
                });
                state.players.len() - 1
            }
        };

        let player = &mut state.players[index];
        player.display_name = profile.name.clone();
        player.last_fetched_at = Some(
            player
                .last_fetched_at
                .map_or(captured_at, |at| at.max(captured_at)),
        );
        player.updated_at = now;
        let player = player.clone();

        state.snapshots.push(Snapshot {
            player_id: player.id,
            captured_at,
            profile: profile.clone(),
        });
        Ok(player)
    }

    async fn find_player(&self, handle: &str) -> Result<Option<Player>, StoreError> {
        let state = self.state.read().await;
        Ok(state.players.iter().find(|p| p.handle == handle).cloned())
    }

    async fn latest_snapshot(
        &self,
        player_id: DbId,
        before: Option<Timestamp>,
    ) -> Result<Option<Snapshot>, StoreError> {
        let state = self.state.read().await;
        Ok(ordered(&state.snapshots, |s| {
            s.player_id == player_id && before.is_none_or(|before| s.captured_at < before)
        })
        .pop())
    }

    async fn snapshots_for_player(
        &self,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let state = self.state.read().await;
        Ok(ordered(&state.snapshots, |s| {
            s.player_id == player_id && in_range(s.captured_at, since, until)
        }))
    }

    async fn snapshots_between(
        &self,
        since: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let state = self.state.read().await;
        Ok(ordered(&state.snapshots, |s| {
            in_range(s.captured_at, since, Some(until))
        }))
    }

    async fn recently_fetched(
        &self,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<Player>, StoreError> {
        let state = self.state.read().await;
        let mut players: Vec<Player> = state
            .players
            .iter()
            .filter(|p| p.last_fetched_at.is_some_and(|at| at >= since))
            .cloned()
            .collect();
        players.sort_by(|a, b| b.last_fetched_at.cmp(&a.last_fetched_at));
        players.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(players)
    }
}
