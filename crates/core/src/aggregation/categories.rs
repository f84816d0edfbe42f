//! Share of XP gained per skill category across all players.

use serde::Serialize;

use super::deltas::profile_deltas;
use super::group_by_player;
use crate::profile::Snapshot;
use crate::skills::{self, SkillCategory};
use crate::types::Xp;

/// XP gained in one category and its share of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: SkillCategory,
    pub label: &'static str,
    pub xp: Xp,
    /// Percentage of the grand total, rounded to two decimals.
    pub percent: f64,
}

/// Category breakdown for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub total_xp: Xp,
    pub categories: Vec<CategoryShare>,
}

/// Sum per-skill gains into categories across every player in the window.
///
/// For each player the first and last snapshot are compared skill by skill
/// (negative deltas count as zero). Percentages are of the grand total; if
/// nobody gained anything every category reports 0%.
pub fn category_totals(snapshots: &[Snapshot]) -> CategoryBreakdown {
    let mut sums = [0 as Xp; SkillCategory::ALL.len()];

    for (_, history) in group_by_player(snapshots) {
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            continue;
        };
        for delta in profile_deltas(&first.profile, &last.profile) {
            let Some(category) = skills::category_of(&delta.skill) else {
                continue;
            };
            if let Some(slot) = SkillCategory::ALL.iter().position(|c| *c == category) {
                sums[slot] += delta.xp_gain;
            }
        }
    }

    let total_xp: Xp = sums.iter().sum();
    let categories = SkillCategory::ALL
        .iter()
        .zip(sums)
        .map(|(&category, xp)| CategoryShare {
            category,
            label: category.label(),
            xp,
            percent: percent_of(xp, total_xp),
        })
        .collect();

    CategoryBreakdown {
        total_xp,
        categories,
    }
}

fn percent_of(part: Xp, total: Xp) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / total as f64).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::test_support::{at, snapshot_with_skills, stat};

    fn share(breakdown: &CategoryBreakdown, category: SkillCategory) -> &CategoryShare {
        breakdown
            .categories
            .iter()
            .find(|c| c.category == category)
            .unwrap()
    }

    #[test]
    fn all_zero_reports_zero_percent() {
        let breakdown = category_totals(&[]);
        assert_eq!(breakdown.total_xp, 0);
        assert_eq!(breakdown.categories.len(), SkillCategory::ALL.len());
        assert!(breakdown.categories.iter().all(|c| c.percent == 0.0));
    }

    #[test]
    fn sums_gains_across_players() {
        let snaps = vec![
            snapshot_with_skills(1, at(1, 0), 0, vec![stat("attack", 1, 0), stat("mining", 1, 0)]),
            snapshot_with_skills(2, at(1, 0), 0, vec![stat("cooking", 1, 0)]),
            snapshot_with_skills(1, at(1, 9), 0, vec![stat("attack", 1, 300), stat("mining", 1, 100)]),
            snapshot_with_skills(2, at(1, 9), 0, vec![stat("cooking", 1, 600)]),
        ];
        let breakdown = category_totals(&snaps);
        assert_eq!(breakdown.total_xp, 1_000);
        assert_eq!(share(&breakdown, SkillCategory::Combat).xp, 300);
        assert_eq!(share(&breakdown, SkillCategory::Gathering).percent, 10.0);
        assert_eq!(share(&breakdown, SkillCategory::Artisan).percent, 60.0);
        assert_eq!(share(&breakdown, SkillCategory::Support).percent, 0.0);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let snaps = vec![
            snapshot_with_skills(
                1,
                at(1, 0),
                0,
                vec![stat("attack", 1, 0), stat("mining", 1, 0), stat("agility", 1, 0)],
            ),
            snapshot_with_skills(
                1,
                at(1, 9),
                0,
                vec![stat("attack", 1, 1), stat("mining", 1, 1), stat("agility", 1, 1)],
            ),
        ];
        let breakdown = category_totals(&snaps);
        let sum: f64 = breakdown.categories.iter().map(|c| c.percent).sum();
        assert!((sum - 100.0).abs() < 0.05, "sum was {sum}");
    }

    #[test]
    fn negative_skill_deltas_do_not_reduce_totals() {
        let snaps = vec![
            snapshot_with_skills(1, at(1, 0), 0, vec![stat("attack", 1, 500), stat("mining", 1, 0)]),
            snapshot_with_skills(1, at(1, 9), 0, vec![stat("attack", 1, 100), stat("mining", 1, 50)]),
        ];
        let breakdown = category_totals(&snaps);
        assert_eq!(breakdown.total_xp, 50);
        assert_eq!(share(&breakdown, SkillCategory::Gathering).percent, 100.0);
    }
}
