//! The freshness protocol: fetch, or serve what is already cached.

use std::time::Duration;

/// Default window during which a cached profile is served without fetching.
pub const DEFAULT_AUTO_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default minimum interval between user-requested refreshes.
pub const DEFAULT_MANUAL_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// What a refresh request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Fetch and stamp both the fetch and manual timestamps.
    ManualFetch,
    /// Return the cached profile untouched.
    ServeCached,
    /// Fetch and stamp only the fetch timestamp.
    Fetch,
}

/// The two independent cooldowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub auto_window: Duration,
    pub manual_cooldown: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            auto_window: DEFAULT_AUTO_WINDOW,
            manual_cooldown: DEFAULT_MANUAL_COOLDOWN,
        }
    }
}

impl RefreshPolicy {
    /// Decide how to serve a request at `now_ms`.
    ///
    /// Rules apply in order:
    /// 1. a manual request whose last manual refresh is older than the
    ///    manual cooldown (or absent) fetches;
    /// 2. a cached profile whose last fetch is within the auto window is
    ///    served as is;
    /// 3. anything else fetches.
    ///
    /// Timestamps in the future count as "just now".
    pub fn decide(
        &self,
        now_ms: i64,
        manual: bool,
        last_fetch_ms: Option<i64>,
        last_manual_ms: Option<i64>,
        has_cached: bool,
    ) -> RefreshDecision {
        if manual && exceeds(now_ms, last_manual_ms, self.manual_cooldown) {
            return RefreshDecision::ManualFetch;
        }
        if has_cached && !exceeds(now_ms, last_fetch_ms, self.auto_window) {
            return RefreshDecision::ServeCached;
        }
        RefreshDecision::Fetch
    }
}

/// Whether more than `limit` has passed since `since_ms`. An absent
/// timestamp is infinitely old.
fn exceeds(now_ms: i64, since_ms: Option<i64>, limit: Duration) -> bool {
    let Some(since_ms) = since_ms else {
        return true;
    };
    let elapsed = now_ms.saturating_sub(since_ms).max(0);
    let limit_ms = i64::try_from(limit.as_millis()).unwrap_or(i64::MAX);
    elapsed > limit_ms
}
