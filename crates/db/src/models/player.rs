//! Player entity model.

use serde::Serialize;
use skilltrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `players` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: DbId,
    /// Normalized handle (trimmed, lower-case). Unique.
    pub handle: String,
    /// Name as last reported by the profile source.
    pub display_name: String,
    pub last_fetched_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
