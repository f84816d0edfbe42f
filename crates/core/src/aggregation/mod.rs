//! Aggregation engine: pure, read-only views over snapshot history.
//!
//! Every function here takes snapshots already loaded by the caller and
//! returns a fresh value. Nothing is cached between calls and nothing is
//! written back. "No data" conditions (empty windows, absent skills)
//! produce empty or zero results, never errors.
//!
//! All daily views share one bucketing rule: group by UTC calendar date
//! and keep the latest snapshot of each date (see [`bucket_by_day`]).

pub mod bucketing;
pub mod categories;
pub mod cross_player;
pub mod deltas;
pub mod leaderboard;
pub mod trend;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Xp;

pub use bucketing::{bucket_by_day, group_by_player};
pub use categories::{category_totals, CategoryBreakdown, CategoryShare};
pub use cross_player::{daily_totals, top_gainers, TopGainer, DAILY_TOTAL_DAYS};
pub use deltas::{skill_deltas, SkillDelta};
pub use leaderboard::{skill_leaderboard, LeaderboardRow, LeaderboardSkill, LeaderboardWindow};
pub use trend::{spike_drop, weekly_gains, WEEKLY_DAYS};

/// One point of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Xp,
}

/// Clamp a raw difference to a gain, logging upstream regressions.
pub(crate) fn clamp_gain(raw: Xp, context: &'static str) -> Xp {
    if raw < 0 {
        tracing::warn!(
            delta = raw,
            context,
            "Data regression: later snapshot reports less than an earlier one"
        );
        return 0;
    }
    raw
}

/// The `days` calendar dates ending at `last`, oldest first.
pub(crate) fn trailing_dates(last: NaiveDate, days: u64) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|offset| last.checked_sub_days(chrono::Days::new(offset)))
        .collect()
}
