//! Row structs.
//!
//! Each submodule contains the `FromRow` structs for one table family.
//! Snapshot rows are assembled into core [`Snapshot`]s before leaving
//! this crate.
//!
//! [`Snapshot`]: skilltrack_core::profile::Snapshot

pub mod player;
pub mod snapshot;
