//! Repository for the `snapshots` table and its child rows.
//!
//! A snapshot is written as one unit of work: the player row, the snapshot
//! row, its skill and activity rows, and the player's `last_fetched_at`
//! are committed together or not at all.

use skilltrack_core::profile::{Profile, Snapshot};
use skilltrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::player::Player;
use crate::models::snapshot::{assemble, SnapshotActivityRow, SnapshotRow, SnapshotSkillRow};
use crate::repositories::PlayerRepo;

/// Column list for `snapshots` queries.
const COLUMNS: &str = "id, player_id, player_name, captured_at, rank, total_xp, total_level, \
    combat_level, logged_in, quests_complete, quests_started, quests_not_started";

/// Column list for `snapshot_skills` queries.
const SKILL_COLUMNS: &str = "snapshot_id, position, skill, level, real_level, virtual_level, xp, rank";

/// Column list for `snapshot_activities` queries.
const ACTIVITY_COLUMNS: &str = "snapshot_id, position, occurred_at, text, details";

/// Player column list for `RETURNING`.
const PLAYER_COLUMNS: &str = "id, handle, display_name, last_fetched_at, created_at, updated_at";

/// Result of [`SnapshotRepo::append`].
#[derive(Debug, Clone)]
pub struct AppendedSnapshot {
    /// The player row after `last_fetched_at` was advanced.
    pub player: Player,
    pub snapshot_id: DbId,
}

/// Provides data access for profile snapshots.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Record a profile capture for `handle` in a single transaction.
    ///
    /// Creates the player on first sight. `last_fetched_at` only moves
    /// forward.
    pub async fn append(
        pool: &PgPool,
        handle: &str,
        profile: &Profile,
        captured_at: Timestamp,
    ) -> Result<AppendedSnapshot, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let player_id = PlayerRepo::find_or_create_in_tx(&mut tx, handle, &profile.name)
            .await?
            .id;

        let snapshot_id: DbId = sqlx::query_scalar(
            "INSERT INTO snapshots
                (player_id, player_name, captured_at, rank, total_xp, total_level,
                 combat_level, logged_in, quests_complete, quests_started, quests_not_started)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(player_id)
        .bind(&profile.name)
        .bind(captured_at)
        .bind(profile.rank)
        .bind(profile.total_xp)
        .bind(profile.total_level)
        .bind(profile.combat_level)
        .bind(profile.logged_in)
        .bind(profile.quests_complete)
        .bind(profile.quests_started)
        .bind(profile.quests_not_started)
        .fetch_one(&mut *tx)
        .await?;

        if !profile.skills.is_empty() {
            let positions: Vec<i16> = (0..profile.skills.len()).map(|i| i as i16).collect();
            let names: Vec<&str> = profile.skills.iter().map(|s| s.skill.as_str()).collect();
            let levels: Vec<i32> = profile.skills.iter().map(|s| s.level).collect();
            let real_levels: Vec<i32> = profile.skills.iter().map(|s| s.real_level).collect();
            let virtual_levels: Vec<i32> = profile.skills.iter().map(|s| s.virtual_level).collect();
            let xps: Vec<i64> = profile.skills.iter().map(|s| s.xp).collect();
            let ranks: Vec<Option<i64>> = profile.skills.iter().map(|s| s.rank).collect();

            sqlx::query(
                "INSERT INTO snapshot_skills
                    (snapshot_id, position, skill, level, real_level, virtual_level, xp, rank)
                 SELECT $1::BIGINT, * FROM UNNEST(
                    $2::SMALLINT[], $3::TEXT[], $4::INTEGER[], $5::INTEGER[],
                    $6::INTEGER[], $7::BIGINT[], $8::BIGINT[]
                 )",
            )
            .bind(snapshot_id)
            .bind(&positions)
            .bind(&names)
            .bind(&levels)
            .bind(&real_levels)
            .bind(&virtual_levels)
            .bind(&xps)
            .bind(&ranks)
            .execute(&mut *tx)
            .await?;
        }

        if !profile.activities.is_empty() {
            let positions: Vec<i16> = (0..profile.activities.len()).map(|i| i as i16).collect();
            let occurred: Vec<Timestamp> = profile.activities.iter().map(|a| a.occurred_at).collect();
            let texts: Vec<&str> = profile.activities.iter().map(|a| a.text.as_str()).collect();
            let details: Vec<&str> = profile.activities.iter().map(|a| a.details.as_str()).collect();

            sqlx::query(
                "INSERT INTO snapshot_activities (snapshot_id, position, occurred_at, text, details)
                 SELECT $1::BIGINT, * FROM UNNEST($2::SMALLINT[], $3::TIMESTAMPTZ[], $4::TEXT[], $5::TEXT[])",
            )
            .bind(snapshot_id)
            .bind(&positions)
            .bind(&occurred)
            .bind(&texts)
            .bind(&details)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "UPDATE players SET
                last_fetched_at = GREATEST(COALESCE(last_fetched_at, $2), $2),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAYER_COLUMNS}"
        );
        let player = sqlx::query_as::<_, Player>(&query)
            .bind(player_id)
            .bind(captured_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(player_id, snapshot_id, %captured_at, "Snapshot appended");
        Ok(AppendedSnapshot {
            player,
            snapshot_id,
        })
    }

    /// The most recent snapshot for a player, or the most recent one
    /// captured strictly before `before` when given.
    pub async fn latest_for_player(
        pool: &PgPool,
        player_id: DbId,
        before: Option<Timestamp>,
    ) -> Result<Option<Snapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM snapshots
             WHERE player_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR captured_at < $2)
             ORDER BY captured_at DESC, id DESC
             LIMIT 1"
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&query)
            .bind(player_id)
            .bind(before)
            .fetch_all(pool)
            .await?;
        Ok(Self::load_children(pool, rows).await?.pop())
    }

    /// Snapshots for a player in `[since, until]`, oldest first.
    ///
    /// Either bound may be omitted. `limit` caps the number returned,
    /// counting from the oldest.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
        limit: Option<i64>,
    ) -> Result<Vec<Snapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM snapshots
             WHERE player_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR captured_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR captured_at <= $3)
             ORDER BY captured_at ASC, id ASC
             LIMIT $4"
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&query)
            .bind(player_id)
            .bind(since)
            .bind(until)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Self::load_children(pool, rows).await
    }

    /// Every player's snapshots in `[since, until]`, oldest first.
    pub async fn list_all_between(
        pool: &PgPool,
        since: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<Vec<Snapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM snapshots
             WHERE ($1::TIMESTAMPTZ IS NULL OR captured_at >= $1)
               AND captured_at <= $2
             ORDER BY captured_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&query)
            .bind(since)
            .bind(until)
            .fetch_all(pool)
            .await?;
        Self::load_children(pool, rows).await
    }

    /// Fetch skill and activity rows for `rows` and assemble snapshots.
    async fn load_children(
        pool: &PgPool,
        rows: Vec<SnapshotRow>,
    ) -> Result<Vec<Snapshot>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let query = format!(
            "SELECT {SKILL_COLUMNS} FROM snapshot_skills
             WHERE snapshot_id = ANY($1)
             ORDER BY snapshot_id, position"
        );
        let skills = sqlx::query_as::<_, SnapshotSkillRow>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM snapshot_activities
             WHERE snapshot_id = ANY($1)
             ORDER BY snapshot_id, position"
        );
        let activities = sqlx::query_as::<_, SnapshotActivityRow>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        Ok(assemble(rows, skills, activities))
    }
}
