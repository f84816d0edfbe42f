//! Static skill table, skill categories and level math.
//!
//! The table is the single mapping from the profile source's numeric skill
//! identifiers to stable skill names. The normalizer uses it to translate
//! raw payloads; the aggregation engine uses it read-only for category
//! grouping and skill lookups.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::types::Xp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Highest level shown as a "real" level.
pub const REAL_LEVEL_CAP: i32 = 99;

/// Highest virtual level derivable from the experience table.
pub const VIRTUAL_LEVEL_CAP: i32 = 120;

/// Name used for the all-skills aggregate in leaderboards.
pub const OVERALL: &str = "overall";

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Fixed grouping of skills used by category breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Combat,
    Gathering,
    Artisan,
    Support,
    Elite,
}

impl SkillCategory {
    /// All categories in display order.
    pub const ALL: [SkillCategory; 5] = [
        Self::Combat,
        Self::Gathering,
        Self::Artisan,
        Self::Support,
        Self::Elite,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Combat => "Combat",
            Self::Gathering => "Gathering",
            Self::Artisan => "Artisan",
            Self::Support => "Support",
            Self::Elite => "Elite",
        }
    }
}

// ---------------------------------------------------------------------------
// Skill table
// ---------------------------------------------------------------------------

/// One entry of the static skill table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    /// Identifier used by the profile source.
    pub id: u8,
    /// Stable lower-case name used everywhere internally.
    pub name: &'static str,
    pub category: SkillCategory,
    /// Elite skills follow a different experience curve, so their virtual
    /// level cannot be derived from the standard table.
    pub elite: bool,
}

const fn skill(id: u8, name: &'static str, category: SkillCategory) -> Skill {
    Skill {
        id,
        name,
        category,
        elite: false,
    }
}

/// Every known skill, ordered by source identifier.
pub static SKILLS: &[Skill] = &[
    skill(0, "attack", SkillCategory::Combat),
    skill(1, "defence", SkillCategory::Combat),
    skill(2, "strength", SkillCategory::Combat),
    skill(3, "constitution", SkillCategory::Combat),
    skill(4, "ranged", SkillCategory::Combat),
    skill(5, "prayer", SkillCategory::Combat),
    skill(6, "magic", SkillCategory::Combat),
    skill(7, "cooking", SkillCategory::Artisan),
    skill(8, "woodcutting", SkillCategory::Gathering),
    skill(9, "fletching", SkillCategory::Artisan),
    skill(10, "fishing", SkillCategory::Gathering),
    skill(11, "firemaking", SkillCategory::Artisan),
    skill(12, "crafting", SkillCategory::Artisan),
    skill(13, "smithing", SkillCategory::Artisan),
    skill(14, "mining", SkillCategory::Gathering),
    skill(15, "herblore", SkillCategory::Artisan),
    skill(16, "agility", SkillCategory::Support),
    skill(17, "thieving", SkillCategory::Support),
    skill(18, "slayer", SkillCategory::Support),
    skill(19, "farming", SkillCategory::Gathering),
    skill(20, "runecrafting", SkillCategory::Artisan),
    skill(21, "hunter", SkillCategory::Gathering),
    skill(22, "construction", SkillCategory::Artisan),
    skill(23, "summoning", SkillCategory::Combat),
    skill(24, "dungeoneering", SkillCategory::Support),
    skill(25, "divination", SkillCategory::Gathering),
    Skill {
        id: 26,
        name: "invention",
        category: SkillCategory::Elite,
        elite: true,
    },
    skill(27, "archaeology", SkillCategory::Gathering),
    skill(28, "necromancy", SkillCategory::Combat),
];

/// Look up a skill by its source identifier.
pub fn by_id(id: u8) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}

/// Look up a skill by name, case-insensitively.
pub fn by_name(name: &str) -> Option<&'static Skill> {
    let name = name.trim();
    SKILLS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Category of the named skill, if it is known.
pub fn category_of(name: &str) -> Option<SkillCategory> {
    by_name(name).map(|s| s.category)
}

/// Position of the named skill in the table; unknown names sort last.
pub fn table_position(name: &str) -> usize {
    SKILLS
        .iter()
        .position(|s| s.name == name)
        .unwrap_or(SKILLS.len())
}

// ---------------------------------------------------------------------------
// Experience table
// ---------------------------------------------------------------------------

/// `XP_TABLE[level]` is the experience required to reach `level`.
/// Index 0 is unused.
static XP_TABLE: LazyLock<Vec<Xp>> = LazyLock::new(|| {
    let mut table = vec![0; (VIRTUAL_LEVEL_CAP + 1) as usize];
    let mut points = 0f64;
    for level in 1..VIRTUAL_LEVEL_CAP {
        let n = level as f64;
        points += (n + 300.0 * 2f64.powf(n / 7.0)).floor();
        table[(level + 1) as usize] = (points / 4.0).floor() as Xp;
    }
    table
});

/// Experience required to reach `level` on the standard curve.
///
/// Levels outside `1..=120` are clamped into that range.
pub fn xp_for_level(level: i32) -> Xp {
    XP_TABLE[level.clamp(1, VIRTUAL_LEVEL_CAP) as usize]
}

/// Highest standard-curve level reachable with `xp` experience.
pub fn level_for_xp(xp: Xp) -> i32 {
    let mut level = 1;
    for candidate in 2..=VIRTUAL_LEVEL_CAP {
        if XP_TABLE[candidate as usize] > xp {
            break;
        }
        level = candidate;
    }
    level
}

/// Level shown as the "real" level: the reported level capped at 99.
pub fn real_level(level: i32) -> i32 {
    level.min(REAL_LEVEL_CAP)
}

/// Level implied by experience, never lower than what the source reported.
///
/// Elite skills keep the reported level.
pub fn virtual_level(skill: &Skill, reported_level: i32, xp: Xp) -> i32 {
    if skill.elite {
        return reported_level;
    }
    reported_level.max(level_for_xp(xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_identifiers_zero_through_twenty_eight() {
        for id in 0..=28u8 {
            assert!(by_id(id).is_some(), "missing skill id {id}");
        }
        assert!(by_id(29).is_none());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = SKILLS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SKILLS.len());
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        assert_eq!(by_name("Slayer").map(|s| s.id), Some(18));
        assert_eq!(by_name(" NECROMANCY ").map(|s| s.id), Some(28));
        assert!(by_name("sailing").is_none());
    }

    #[test]
    fn experience_table_matches_known_thresholds() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_for_level(10), 1_154);
        assert_eq!(xp_for_level(99), 13_034_431);
        assert_eq!(xp_for_level(120), 104_273_167);
    }

    #[test]
    fn level_for_xp_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(82), 1);
        assert_eq!(level_for_xp(83), 2);
        assert_eq!(level_for_xp(13_034_430), 98);
        assert_eq!(level_for_xp(13_034_431), 99);
        assert_eq!(level_for_xp(200_000_000), 120);
    }

    #[test]
    fn real_level_is_capped_but_virtual_level_is_not() {
        let slayer = by_name("slayer").unwrap();
        assert_eq!(real_level(105), 99);
        assert_eq!(virtual_level(slayer, 99, 40_000_000), 110);
        assert_eq!(virtual_level(slayer, 99, 13_034_431), 99);
    }

    #[test]
    fn elite_skill_keeps_reported_level() {
        let invention = by_name("invention").unwrap();
        assert_eq!(virtual_level(invention, 120, 80_618_654), 120);
        assert_eq!(virtual_level(invention, 50, 40_000_000), 50);
    }
}
