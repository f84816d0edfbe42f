//! Repository for the `players` table.

use skilltrack_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::player::Player;

/// Column list for `players` queries.
const COLUMNS: &str = "id, handle, display_name, last_fetched_at, created_at, updated_at";

/// Provides data access for tracked players.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Find a player by normalized handle.
    pub async fn find_by_handle(pool: &PgPool, handle: &str) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE handle = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(handle)
            .fetch_optional(pool)
            .await
    }

    /// Return the player for `handle` within an existing transaction,
    /// creating it if it does not exist.
    ///
    /// The display name is refreshed on every call so it tracks the
    /// source's capitalisation.
    pub async fn find_or_create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        handle: &str,
        display_name: &str,
    ) -> Result<Player, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (handle, display_name)
             VALUES ($1, $2)
             ON CONFLICT (handle) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(handle)
            .bind(display_name)
            .fetch_one(&mut **tx)
            .await
    }

    /// List players fetched at or after `since`, most recently fetched first.
    pub async fn list_recently_fetched(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<Player>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM players
             WHERE last_fetched_at >= $1
             ORDER BY last_fetched_at DESC, id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
