//! Profile normalizer: raw profile-source payload to [`Profile`].
//!
//! The source uses its own field names, reports ranks as comma-grouped
//! strings, identifies skills by small integers and reports skill XP in
//! tenths. This module is the only place that knows about that shape.
//! Normalization is all-or-nothing: any malformed required field aborts
//! the whole profile so no partial snapshot can be written.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{Activity, Profile, SkillStat};
use crate::skills::{self, real_level, virtual_level};
use crate::types::{Timestamp, Xp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Error code the source returns for handles it has never seen.
pub const SOURCE_ERROR_NO_PROFILE: &str = "NO_PROFILE";

/// Error code the source returns for players who hid their profile.
pub const SOURCE_ERROR_PRIVATE: &str = "PROFILE_PRIVATE";

/// Divisor for skill XP values from the profile source.
///
/// The source reports per-skill XP with one extra trailing digit (tenths of
/// an XP point). This is a decoding rule for `skillvalues[].xp` from this
/// source only. `totalxp` is already whole XP and must not be divided.
pub const SKILL_XP_DIVISOR: Xp = 10;

const ACTIVITY_DATETIME_FORMAT: &str = "%d-%b-%Y %H:%M";
const ACTIVITY_DATE_FORMAT: &str = "%d-%b-%Y";

// ---------------------------------------------------------------------------
// Raw payload
// ---------------------------------------------------------------------------

/// A rank as sent by the source: either `"1,234"` or `1234`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRank {
    Number(i64),
    Text(String),
}

/// One entry of the source's `skillvalues` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSkillValue {
    pub id: i64,
    pub level: i32,
    /// Encoded in tenths; see [`SKILL_XP_DIVISOR`].
    pub xp: Xp,
    #[serde(default)]
    pub rank: Option<i64>,
}

/// One entry of the source's `activities` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivity {
    pub date: String,
    pub text: String,
    #[serde(default)]
    pub details: String,
}

/// The profile source's payload, field names as the source spells them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<RawRank>,
    #[serde(default, rename = "totalxp")]
    pub total_xp: Option<Xp>,
    #[serde(default, rename = "totalskill")]
    pub total_skill: Option<i32>,
    #[serde(default, rename = "combatlevel")]
    pub combat_level: Option<i32>,
    #[serde(default, rename = "loggedIn")]
    pub logged_in: Option<String>,
    #[serde(default, rename = "questscomplete")]
    pub quests_complete: Option<i32>,
    #[serde(default, rename = "questsstarted")]
    pub quests_started: Option<i32>,
    #[serde(default, rename = "questsnotstarted")]
    pub quests_not_started: Option<i32>,
    #[serde(default, rename = "skillvalues")]
    pub skill_values: Option<Vec<RawSkillValue>>,
    #[serde(default)]
    pub activities: Option<Vec<RawActivity>>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a raw payload could not be turned into a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Profile source has no profile for this player")]
    NoProfile,

    #[error("Profile is private")]
    PrivateProfile,

    #[error("Profile source reported an error: {0}")]
    SourceReported(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid rank value '{0}'")]
    InvalidRank(String),

    #[error("Invalid activity date '{0}'")]
    InvalidActivityDate(String),
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Convert a raw source payload into a normalized [`Profile`].
pub fn normalize(raw: RawProfile) -> Result<Profile, NormalizeError> {
    if let Some(code) = raw.error {
        return Err(match code.as_str() {
            SOURCE_ERROR_NO_PROFILE => NormalizeError::NoProfile,
            SOURCE_ERROR_PRIVATE => NormalizeError::PrivateProfile,
            _ => NormalizeError::SourceReported(code),
        });
    }

    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(NormalizeError::MissingField("name"))?;
    let rank = parse_rank(raw.rank.as_ref().ok_or(NormalizeError::MissingField("rank"))?)?;
    let raw_skills = raw
        .skill_values
        .ok_or(NormalizeError::MissingField("skillvalues"))?;
    let raw_activities = raw
        .activities
        .ok_or(NormalizeError::MissingField("activities"))?;

    let skills = normalize_skills(raw_skills);
    let activities = raw_activities
        .into_iter()
        .map(|a| {
            Ok(Activity {
                occurred_at: parse_activity_date(&a.date)?,
                text: a.text,
                details: a.details,
            })
        })
        .collect::<Result<Vec<_>, NormalizeError>>()?;

    let total_xp = raw
        .total_xp
        .unwrap_or_else(|| skills.iter().map(|s| s.xp).sum());
    let total_level = raw
        .total_skill
        .unwrap_or_else(|| skills.iter().map(|s| s.level).sum());
    let combat_level = raw
        .combat_level
        .unwrap_or_else(|| combat_level_from_skills(&skills));

    Ok(Profile {
        name,
        rank,
        total_xp,
        total_level,
        combat_level,
        logged_in: raw.logged_in.as_deref() == Some("true"),
        quests_complete: raw.quests_complete.unwrap_or(0),
        quests_started: raw.quests_started.unwrap_or(0),
        quests_not_started: raw.quests_not_started.unwrap_or(0),
        skills,
        activities,
    })
}

/// Map raw skill values onto the skill table, in table order.
///
/// Unknown identifiers are dropped. Duplicate identifiers keep the first
/// occurrence.
fn normalize_skills(raw: Vec<RawSkillValue>) -> Vec<SkillStat> {
    let mut known: Vec<(&'static skills::Skill, RawSkillValue)> = Vec::with_capacity(raw.len());
    for value in raw {
        let Some(skill) = u8::try_from(value.id).ok().and_then(skills::by_id) else {
            tracing::debug!(skill_id = value.id, "Dropping unknown skill id");
            continue;
        };
        if known.iter().any(|(s, _)| s.id == skill.id) {
            continue;
        }
        known.push((skill, value));
    }
    known.sort_by_key(|(s, _)| s.id);

    known
        .into_iter()
        .map(|(skill, value)| {
            let xp = value.xp / SKILL_XP_DIVISOR;
            SkillStat {
                skill: skill.name.to_string(),
                level: value.level,
                real_level: real_level(value.level),
                virtual_level: virtual_level(skill, value.level, xp),
                xp,
                rank: value.rank,
            }
        })
        .collect()
}

/// Parse a rank that may carry grouping separators (`"1,234,567"`).
pub fn parse_rank(rank: &RawRank) -> Result<i64, NormalizeError> {
    match rank {
        RawRank::Number(n) => Ok(*n),
        RawRank::Text(text) => {
            let digits: String = text
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            digits
                .parse()
                .map_err(|_| NormalizeError::InvalidRank(text.clone()))
        }
    }
}

/// Parse the source's `dd-Mon-yyyy[ HH:MM]` activity date as UTC.
pub fn parse_activity_date(text: &str) -> Result<Timestamp, NormalizeError> {
    let trimmed = text.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, ACTIVITY_DATETIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, ACTIVITY_DATE_FORMAT)
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| NormalizeError::InvalidActivityDate(text.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Combat level from capped skill levels, used when the source omits it.
pub fn combat_level_from_skills(skills: &[SkillStat]) -> i32 {
    let level = |name: &str, default: i32| {
        skills
            .iter()
            .find(|s| s.skill == name)
            .map(|s| s.real_level)
            .unwrap_or(default)
    };
    let attack = level("attack", 1);
    let strength = level("strength", 1);
    let defence = level("defence", 1);
    let constitution = level("constitution", 10);
    let ranged = level("ranged", 1);
    let magic = level("magic", 1);
    let necromancy = level("necromancy", 1);
    let prayer = level("prayer", 1);
    let summoning = level("summoning", 1);

    let offence = (attack + strength)
        .max(2 * magic)
        .max(2 * ranged)
        .max(2 * necromancy);
    // Integer form of (1.3 * offence + defence + constitution + prayer/2 + summoning/2) / 4.
    let scaled = 13 * offence + 10 * (defence + constitution + prayer / 2 + summoning / 2);
    scaled / 40
}
