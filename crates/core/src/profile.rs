//! Normalized player profile and snapshot types.
//!
//! A [`Profile`] is the internal shape produced by the normalizer and held
//! in the cache. A [`Snapshot`] is one stored capture of a profile for a
//! player at a point in time; snapshots are immutable once written.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp, Xp};

/// Maximum length of a player handle.
pub const MAX_HANDLE_LENGTH: usize = 12;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9 -]{1,12}$").expect("valid regex"));

/// One skill's state inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStat {
    /// Stable skill name from the skill table.
    pub skill: String,
    /// Level as reported by the source.
    pub level: i32,
    /// Level capped at 99 for display.
    pub real_level: i32,
    /// Level implied by experience; may exceed 99.
    pub virtual_level: i32,
    pub xp: Xp,
    pub rank: Option<i64>,
}

/// One entry of the player's recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub occurred_at: Timestamp,
    pub text: String,
    pub details: String,
}

/// The normalized, source-independent view of a player's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name as reported by the source.
    pub name: String,
    pub rank: i64,
    pub total_xp: Xp,
    pub total_level: i32,
    pub combat_level: i32,
    pub logged_in: bool,
    pub quests_complete: i32,
    pub quests_started: i32,
    pub quests_not_started: i32,
    pub skills: Vec<SkillStat>,
    pub activities: Vec<Activity>,
}

impl Profile {
    /// Look up a skill's state by name.
    pub fn skill(&self, name: &str) -> Option<&SkillStat> {
        self.skills.iter().find(|s| s.skill == name)
    }

    /// Sum of experience across every skill record.
    pub fn skill_xp_sum(&self) -> Xp {
        self.skills.iter().map(|s| s.xp).sum()
    }
}

/// One stored capture of a player's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player_id: DbId,
    pub captured_at: Timestamp,
    pub profile: Profile,
}

impl Snapshot {
    pub fn total_xp(&self) -> Xp {
        self.profile.total_xp
    }
}

/// Normalize a player handle for lookups.
///
/// The source accepts `+` and `_` as spaces in its URL form, so both are
/// read as spaces; the result is trimmed and lower-cased. Rejects handles
/// that are empty, longer than 12 characters, or contain characters the
/// source never issues.
pub fn normalize_handle(raw: &str) -> Result<String, CoreError> {
    let handle = raw.replace(['+', '_'], " ").trim().to_lowercase();
    if !HANDLE_RE.is_match(&handle) {
        return Err(CoreError::Validation(format!(
            "Invalid player handle '{raw}'. Must be 1-{MAX_HANDLE_LENGTH} letters, digits, spaces or '-'"
        )));
    }
    Ok(handle)
}
