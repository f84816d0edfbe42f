//! Per-skill level and XP deltas across a snapshot window.

use serde::Serialize;

use super::clamp_gain;
use crate::profile::{Profile, Snapshot};
use crate::skills;
use crate::types::Xp;

/// Level and XP gained in one skill between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillDelta {
    pub skill: String,
    pub level_gain: i32,
    pub xp_gain: Xp,
}

/// Per-skill deltas between the first and last snapshot of a window.
///
/// Snapshots may be in any order; the earliest and latest by capture time
/// are compared. Skills present only in the later snapshot are measured
/// from a zero baseline. Regressions clamp to zero. Returns an empty list
/// when the window has no snapshots.
pub fn skill_deltas(snapshots: &[Snapshot]) -> Vec<SkillDelta> {
    // min_by_key keeps the first of equal keys, max_by_key the last.
    let first = snapshots.iter().min_by_key(|s| s.captured_at);
    let last = snapshots.iter().max_by_key(|s| s.captured_at);
    match (first, last) {
        (Some(first), Some(last)) => profile_deltas(&first.profile, &last.profile),
        _ => Vec::new(),
    }
}

/// Per-skill deltas from `earlier` to `later`, in skill-table order.
pub(crate) fn profile_deltas(earlier: &Profile, later: &Profile) -> Vec<SkillDelta> {
    let mut deltas: Vec<SkillDelta> = later
        .skills
        .iter()
        .map(|current| {
            let (base_level, base_xp) = earlier
                .skill(&current.skill)
                .map(|s| (s.virtual_level, s.xp))
                .unwrap_or((0, 0));
            SkillDelta {
                skill: current.skill.clone(),
                level_gain: (current.virtual_level - base_level).max(0),
                xp_gain: clamp_gain(current.xp - base_xp, "skill_deltas"),
            }
        })
        .collect();
    deltas.sort_by_key(|d| skills::table_position(&d.skill));
    deltas
}
