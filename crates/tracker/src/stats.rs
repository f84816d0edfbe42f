//! Read-only statistics over stored snapshot history.
//!
//! Each method loads the window it needs from the [`SnapshotStore`] and
//! hands it to the aggregation engine. Nothing is cached between calls.

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta};
use skilltrack_core::aggregation::{
    self, CategoryBreakdown, LeaderboardRow, LeaderboardSkill, LeaderboardWindow, SeriesPoint,
    SkillDelta, TopGainer, DAILY_TOTAL_DAYS, WEEKLY_DAYS,
};
use skilltrack_core::error::CoreError;
use skilltrack_core::profile::{normalize_handle, Snapshot};
use skilltrack_core::types::{DbId, Timestamp};

use crate::error::StatsError;
use crate::store::SnapshotStore;

/// Hours in the trailing window for per-skill deltas, top gainers and
/// category totals.
pub const RECENT_WINDOW_HOURS: i64 = 24;

pub struct StatsService {
    store: Arc<dyn SnapshotStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Daily gains for the seven days ending at `today`.
    ///
    /// The newest snapshot before the window is loaded too, so the first
    /// day is measured against the last value seen before it.
    pub async fn weekly_gains(
        &self,
        handle: &str,
        today: NaiveDate,
    ) -> Result<Vec<SeriesPoint>, StatsError> {
        let player_id = self.player_id(handle).await?;
        let since = start_of(today, WEEKLY_DAYS - 1);

        let mut snapshots: Vec<Snapshot> = match since {
            Some(since) => self
                .store
                .latest_snapshot(player_id, Some(since))
                .await?
                .into_iter()
                .collect(),
            None => Vec::new(),
        };
        snapshots.extend(
            self.store
                .snapshots_for_player(player_id, since, None)
                .await?,
        );
        Ok(aggregation::weekly_gains(&snapshots, today))
    }

    /// Per-skill level and XP deltas over the 24 hours ending at `now`.
    pub async fn skill_gains(
        &self,
        handle: &str,
        now: Timestamp,
    ) -> Result<Vec<SkillDelta>, StatsError> {
        let player_id = self.player_id(handle).await?;
        let snapshots = self
            .store
            .snapshots_for_player(player_id, Some(recent_since(now)), Some(now))
            .await?;
        Ok(aggregation::skill_deltas(&snapshots))
    }

    /// XP gained by all players on each of the eight days ending at `today`.
    pub async fn daily_totals(&self, today: NaiveDate) -> Result<Vec<SeriesPoint>, StatsError> {
        let since = start_of(today, DAILY_TOTAL_DAYS - 1);
        let Some(until) = start_of(today, 0).map(|midnight| midnight + TimeDelta::days(1)) else {
            return Ok(aggregation::daily_totals(&[], today));
        };
        let snapshots = self.store.snapshots_between(since, until).await?;
        Ok(aggregation::daily_totals(&snapshots, today))
    }

    /// Biggest total-XP gainers over the 24 hours ending at `now`.
    pub async fn top_gainers(
        &self,
        now: Timestamp,
        limit: usize,
    ) -> Result<Vec<TopGainer>, StatsError> {
        let snapshots = self
            .store
            .snapshots_between(Some(recent_since(now)), now)
            .await?;
        Ok(aggregation::top_gainers(&snapshots, limit))
    }

    /// Leaderboard for `skill` (a skill name or `overall`) over `window`.
    pub async fn leaderboard(
        &self,
        skill: &str,
        window: LeaderboardWindow,
        now: Timestamp,
    ) -> Result<Vec<LeaderboardRow>, StatsError> {
        let skill = LeaderboardSkill::parse(skill)?;
        let snapshots = self.store.snapshots_between(window.since(now), now).await?;
        Ok(aggregation::skill_leaderboard(&snapshots, skill, window, now))
    }

    /// Share of XP gained per skill category over the 24 hours ending at `now`.
    pub async fn category_totals(&self, now: Timestamp) -> Result<CategoryBreakdown, StatsError> {
        let snapshots = self
            .store
            .snapshots_between(Some(recent_since(now)), now)
            .await?;
        Ok(aggregation::category_totals(&snapshots))
    }

    async fn player_id(&self, raw_handle: &str) -> Result<DbId, StatsError> {
        let handle = normalize_handle(raw_handle)?;
        match self.store.find_player(&handle).await? {
            Some(player) => Ok(player.id),
            None => Err(CoreError::NotFound {
                entity: "Player",
                id: handle,
            }
            .into()),
        }
    }
}

fn recent_since(now: Timestamp) -> Timestamp {
    now - TimeDelta::hours(RECENT_WINDOW_HOURS)
}

/// UTC midnight `days_back` days before `date`.
fn start_of(date: NaiveDate, days_back: u64) -> Option<Timestamp> {
    date.checked_sub_days(Days::new(days_back))
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
