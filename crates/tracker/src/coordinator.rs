//! Refresh Coordinator: serve cached data or fetch, then write through.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use skilltrack_core::profile::{normalize_handle, Profile};
use skilltrack_core::types::Timestamp;

use crate::error::{FetchError, RefreshError};
use crate::freshness::{RefreshDecision, RefreshPolicy};
use crate::store::{CooldownKind, ProfileCache, ProfileFetcher, SnapshotStore};

/// Default upper bound on one fetch from the profile source.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the returned profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched during this request.
    Fresh,
    /// Served from the cache inside the freshness window.
    Cached,
    /// The fetch failed; this is the last stored snapshot.
    Stale,
}

/// Result of a refresh request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshOutcome {
    /// Normalized handle.
    pub handle: String,
    pub freshness: Freshness,
    /// When the returned profile was captured.
    pub as_of: Timestamp,
    pub profile: Profile,
}

/// Per-player freshness policy in front of the profile source.
///
/// Writes happen only after a successful fetch, in the order cache,
/// snapshot store, timestamps. A crash part way leaves the store behind
/// the cache, never ahead. Concurrent requests for one player are not
/// serialized; two may both fetch.
pub struct RefreshCoordinator {
    fetcher: Arc<dyn ProfileFetcher>,
    store: Arc<dyn SnapshotStore>,
    cache: ProfileCache,
    policy: RefreshPolicy,
    fetch_timeout: Duration,
}

impl RefreshCoordinator {
    pub fn new(
        fetcher: Arc<dyn ProfileFetcher>,
        store: Arc<dyn SnapshotStore>,
        cache: ProfileCache,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            fetcher,
            store,
            cache,
            policy,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Refresh `handle` as of the current time.
    pub async fn refresh(&self, handle: &str, manual: bool) -> Result<RefreshOutcome, RefreshError> {
        self.refresh_at(handle, manual, Utc::now()).await
    }

    /// Refresh `handle` as of `now`.
    pub async fn refresh_at(
        &self,
        raw_handle: &str,
        manual: bool,
        now: Timestamp,
    ) -> Result<RefreshOutcome, RefreshError> {
        let handle =
            normalize_handle(raw_handle).map_err(|e| RefreshError::InvalidHandle(e.to_string()))?;
        let now_ms = now.timestamp_millis();

        let last_fetch = self.cache.get_timestamp(&handle, CooldownKind::Fetch).await?;
        let last_manual = self.cache.get_timestamp(&handle, CooldownKind::Manual).await?;
        let cached = self.cache.get_profile(&handle).await?;

        let decision =
            self.policy
                .decide(now_ms, manual, last_fetch, last_manual, cached.is_some());
        tracing::debug!(player = %handle, manual, ?decision, "Refresh decision");

        if let (RefreshDecision::ServeCached, Some(profile)) = (decision, cached) {
            let as_of = last_fetch
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or(now);
            return Ok(RefreshOutcome {
                handle,
                freshness: Freshness::Cached,
                as_of,
                profile,
            });
        }

        match self.fetch(&handle).await {
            Ok(profile) => {
                self.write_through(&handle, &profile, now, decision).await?;
                tracing::info!(player = %handle, manual, total_xp = profile.total_xp, "Profile refreshed");
                Ok(RefreshOutcome {
                    handle,
                    freshness: Freshness::Fresh,
                    as_of: now,
                    profile,
                })
            }
            Err(cause) => self.fall_back(handle, cause).await,
        }
    }

    /// One bounded fetch from the profile source.
    async fn fetch(&self, handle: &str) -> Result<Profile, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch_profile(handle)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }

    async fn write_through(
        &self,
        handle: &str,
        profile: &Profile,
        now: Timestamp,
        decision: RefreshDecision,
    ) -> Result<(), RefreshError> {
        let now_ms = now.timestamp_millis();
        self.cache.set_profile(handle, profile).await?;
        self.store.record_snapshot(handle, profile, now).await?;
        self.cache
            .set_timestamp(handle, CooldownKind::Fetch, now_ms)
            .await?;
        if decision == RefreshDecision::ManualFetch {
            self.cache
                .set_timestamp(handle, CooldownKind::Manual, now_ms)
                .await?;
        }
        Ok(())
    }

    /// Serve the last stored snapshot after a failed fetch, or report the
    /// player as not found when there is no history.
    async fn fall_back(
        &self,
        handle: String,
        cause: FetchError,
    ) -> Result<RefreshOutcome, RefreshError> {
        let latest = match self.store.find_player(&handle).await? {
            Some(player) => self.store.latest_snapshot(player.id, None).await?,
            None => None,
        };

        match latest {
            Some(snapshot) => {
                tracing::warn!(
                    player = %handle,
                    error = %cause,
                    captured_at = %snapshot.captured_at,
                    "Profile fetch failed, serving last stored snapshot"
                );
                Ok(RefreshOutcome {
                    handle,
                    freshness: Freshness::Stale,
                    as_of: snapshot.captured_at,
                    profile: snapshot.profile,
                })
            }
            None => {
                tracing::warn!(player = %handle, error = %cause, "Profile fetch failed with no history");
                Err(RefreshError::PlayerNotFound { handle, cause })
            }
        }
    }
}
