//! Refresh coordination and read-side statistics for tracked players.
//!
//! The [`coordinator::RefreshCoordinator`] decides per request whether to
//! serve cached data or fetch from the profile source, and writes fresh
//! captures through to the cache and the snapshot store. The
//! [`stats::StatsService`] loads snapshot windows and hands them to the
//! aggregation engine in `skilltrack_core`.
//!
//! Collaborators sit behind the traits in [`store`], with Postgres
//! ([`postgres`]) and in-process ([`memory`]) implementations.

pub mod coordinator;
pub mod error;
pub mod freshness;
pub mod memory;
pub mod postgres;
pub mod source;
pub mod stats;
pub mod store;

pub use coordinator::{Freshness, RefreshCoordinator, RefreshOutcome};
pub use error::{FetchError, RefreshError, StatsError, StoreError};
pub use freshness::{RefreshDecision, RefreshPolicy};
pub use stats::StatsService;
pub use store::{CacheStore, CooldownKind, ProfileCache, ProfileFetcher, SnapshotStore};
