//! Snapshot entity models and assembly into core [`Snapshot`]s.

use std::collections::HashMap;

use skilltrack_core::profile::{Activity, Profile, SkillStat, Snapshot};
use skilltrack_core::types::{DbId, Timestamp, Xp};
use sqlx::FromRow;

/// A row from the `snapshots` table.
#[derive(Debug, Clone, FromRow)]
pub struct SnapshotRow {
    pub id: DbId,
    pub player_id: DbId,
    pub player_name: String,
    pub captured_at: Timestamp,
    pub rank: i64,
    pub total_xp: Xp,
    pub total_level: i32,
    pub combat_level: i32,
    pub logged_in: bool,
    pub quests_complete: i32,
    pub quests_started: i32,
    pub quests_not_started: i32,
}

/// A row from the `snapshot_skills` table.
#[derive(Debug, Clone, FromRow)]
pub struct SnapshotSkillRow {
    pub snapshot_id: DbId,
    pub position: i16,
    pub skill: String,
    pub level: i32,
    pub real_level: i32,
    pub virtual_level: i32,
    pub xp: Xp,
    pub rank: Option<i64>,
}

/// A row from the `snapshot_activities` table.
#[derive(Debug, Clone, FromRow)]
pub struct SnapshotActivityRow {
    pub snapshot_id: DbId,
    pub position: i16,
    pub occurred_at: Timestamp,
    pub text: String,
    pub details: String,
}

/// Join snapshot rows with their child rows, preserving the order of
/// `rows`. Child rows must already be ordered by `position`.
pub fn assemble(
    rows: Vec<SnapshotRow>,
    skills: Vec<SnapshotSkillRow>,
    activities: Vec<SnapshotActivityRow>,
) -> Vec<Snapshot> {
    let mut skills_by_snapshot: HashMap<DbId, Vec<SkillStat>> = HashMap::new();
    for row in skills {
        skills_by_snapshot
            .entry(row.snapshot_id)
            .or_default()
            .push(SkillStat {
                skill: row.skill,
                level: row.level,
                real_level: row.real_level,
                virtual_level: row.virtual_level,
                xp: row.xp,
                rank: row.rank,
            });
    }

    let mut activities_by_snapshot: HashMap<DbId, Vec<Activity>> = HashMap::new();
    for row in activities {
        activities_by_snapshot
            .entry(row.snapshot_id)
            .or_default()
            .push(Activity {
                occurred_at: row.occurred_at,
                text: row.text,
                details: row.details,
            });
    }

    rows.into_iter()
        .map(|row| Snapshot {
            player_id: row.player_id,
            captured_at: row.captured_at,
            profile: Profile {
                name: row.player_name,
                rank: row.rank,
                total_xp: row.total_xp,
                total_level: row.total_level,
                combat_level: row.combat_level,
                logged_in: row.logged_in,
                quests_complete: row.quests_complete,
                quests_started: row.quests_started,
                quests_not_started: row.quests_not_started,
                skills: skills_by_snapshot.remove(&row.id).unwrap_or_default(),
                activities: activities_by_snapshot.remove(&row.id).unwrap_or_default(),
            },
        })
        .collect()
}
