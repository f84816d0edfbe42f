//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cache_repo;
pub mod player_repo;
pub mod snapshot_repo;

pub use cache_repo::CacheRepo;
pub use player_repo::PlayerRepo;
pub use snapshot_repo::{AppendedSnapshot, SnapshotRepo};
