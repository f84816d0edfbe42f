use std::time::Duration;

use skilltrack_core::error::CoreError;
use skilltrack_core::normalizer::NormalizeError;
use skilltrack_source::SourceError;

/// Failure of the snapshot store or the cache store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A cached value could not be encoded or decoded.
    #[error("Cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Why a single fetch from the profile source produced no profile.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Profile fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a refresh request as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The fetch failed and there is no stored history to fall back on.
    #[error("Player '{handle}' not found: {cause}")]
    PlayerNotFound {
        handle: String,
        #[source]
        cause: FetchError,
    },

    #[error("Invalid player handle: {0}")]
    InvalidHandle(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of a read-side statistics query.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
