//! Domain core for the skill tracker.
//!
//! Pure logic only: no database or network access. Callers load snapshot
//! history and raw source payloads and pass them in.
//!
//! - [`skills`]: the static skill table, categories and level math.
//! - [`normalizer`]: raw profile-source payload to [`profile::Profile`].
//! - [`aggregation`]: daily buckets, gains, leaderboards and category totals.

pub mod aggregation;
pub mod error;
pub mod format;
pub mod normalizer;
pub mod profile;
pub mod skills;
pub mod types;
