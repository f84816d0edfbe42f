//! Repository for the `cache_entries` table.

use skilltrack_core::types::Timestamp;
use sqlx::PgPool;

/// Provides key/value access with optional expiry.
pub struct CacheRepo;

impl CacheRepo {
    /// Get a live value. Expired rows read as absent.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT value FROM cache_entries
             WHERE key = $1 AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Insert or overwrite a value.
    pub async fn set(
        pool: &PgPool,
        key: &str,
        value: &str,
        expires_at: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO cache_entries (key, value, expires_at, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Purge rows whose expiry has passed. Returns the number deleted.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
