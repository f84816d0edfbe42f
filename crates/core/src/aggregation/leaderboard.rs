//! Skill leaderboards over a time window.

use chrono::{Months, TimeDelta};
use serde::{Deserialize, Serialize};

use super::group_by_player;
use crate::error::CoreError;
use crate::format::humanize_xp;
use crate::profile::{Profile, Snapshot};
use crate::skills::{self, Skill, OVERALL};
use crate::types::{DbId, Timestamp, Xp};

/// Valid window names accepted by [`LeaderboardWindow::parse`].
pub const VALID_WINDOWS: &[&str] = &["all_time", "month", "week", "today"];

/// What a leaderboard ranks: the sum of all skills or a single skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardSkill {
    Overall,
    Skill(&'static Skill),
}

impl LeaderboardSkill {
    /// Parse `"overall"` or a skill name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        if name.trim().eq_ignore_ascii_case(OVERALL) {
            return Ok(Self::Overall);
        }
        skills::by_name(name)
            .map(Self::Skill)
            .ok_or_else(|| CoreError::Validation(format!("Unknown skill '{name}'")))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Overall => OVERALL,
            Self::Skill(skill) => skill.name,
        }
    }

    /// The ranked XP value of a profile.
    fn xp_of(self, profile: &Profile) -> Xp {
        match self {
            Self::Overall => profile.skill_xp_sum(),
            Self::Skill(skill) => profile.skill(skill.name).map(|s| s.xp).unwrap_or(0),
        }
    }
}

/// Time window a leaderboard covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardWindow {
    AllTime,
    Month,
    #[default]
    Week,
    Today,
}

impl LeaderboardWindow {
    /// Parse a window name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all_time" | "alltime" | "all" => Ok(Self::AllTime),
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "today" | "day" => Ok(Self::Today),
            _ => Err(CoreError::Validation(format!(
                "Invalid leaderboard window '{value}'. Must be one of: {}",
                VALID_WINDOWS.join(", ")
            ))),
        }
    }

    /// Earliest capture time included in the window, or `None` for all time.
    ///
    /// Each window has its own cutoff: start of the current UTC day for
    /// `Today`, seven days back for `Week`, one calendar month back for
    /// `Month`.
    pub fn since(self, now: Timestamp) -> Option<Timestamp> {
        match self {
            Self::AllTime => None,
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Week => Some(now - TimeDelta::days(7)),
            Self::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc()),
        }
    }
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    /// 1-based position after filtering and sorting.
    pub rank: usize,
    pub player_id: DbId,
    pub name: String,
    /// XP at the player's last snapshot in the window.
    pub xp: Xp,
    pub gained: Xp,
    pub xp_display: String,
    pub gained_display: String,
}

/// Rank players by XP gained in `skill` over `window`.
///
/// Snapshots captured before the window's cutoff are ignored. Each
/// player's gain is the ranked value at their last snapshot minus the
/// value at their first. Players without a positive gain are excluded;
/// ties keep input order.
pub fn skill_leaderboard(
    snapshots: &[Snapshot],
    skill: LeaderboardSkill,
    window: LeaderboardWindow,
    now: Timestamp,
) -> Vec<LeaderboardRow> {
    let since = window.since(now);
    let in_window = snapshots
        .iter()
        .filter(|s| since.is_none_or(|cutoff| s.captured_at >= cutoff) && s.captured_at <= now);

    let mut scored: Vec<(DbId, String, Xp, Xp)> = group_by_player(in_window)
        .into_iter()
        .filter_map(|(player_id, history)| {
            let first = history.first()?;
            let last = history.last()?;
            let xp = skill.xp_of(&last.profile);
            let gained = xp - skill.xp_of(&first.profile);
            (gained > 0).then(|| (player_id, last.profile.name.clone(), xp, gained))
        })
        .collect();

    scored.sort_by(|a, b| b.3.cmp(&a.3));

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (player_id, name, xp, gained))| LeaderboardRow {
            rank: index + 1,
            player_id,
            name,
            xp,
            gained,
            xp_display: humanize_xp(xp),
            gained_display: humanize_xp(gained),
        })
        .collect()
}
