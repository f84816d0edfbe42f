//! HTTP client for the external profile source.
//!
//! Returns the raw payload untouched; decoding into domain types is the
//! job of [`skilltrack_core::normalizer`].

pub mod client;

pub use client::{ProfileClient, SourceError, DEFAULT_ACTIVITY_LIMIT};
