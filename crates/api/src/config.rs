use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use skilltrack_tracker::RefreshPolicy;

/// Which store backs the profile cache and refresh timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// The `cache_entries` table; shared across instances.
    Postgres,
    /// Process memory; single instance only.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL (read in `main`) have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the profile source.
    pub profile_source_url: String,
    pub profile_fetch_timeout_secs: u64,
    /// Recent activities requested per profile fetch.
    pub profile_activity_limit: u32,
    pub freshness_window_secs: u64,
    pub manual_cooldown_secs: u64,
    /// Expiry of cached profiles and refresh timestamps.
    pub cache_ttl_secs: u64,
    pub cache_backend: CacheBackend,
    pub auto_refresh_interval_secs: u64,
    /// Maximum profile fetches in flight during one auto-refresh tick.
    pub auto_refresh_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            profile_source_url: "https://apps.runescape.com/runemetrics".into(),
            profile_fetch_timeout_secs: 10,
            profile_activity_limit: 20,
            freshness_window_secs: 900,
            manual_cooldown_secs: 300,
            cache_ttl_secs: 86_400,
            cache_backend: CacheBackend::Postgres,
            auto_refresh_interval_secs: 3_600,
            auto_refresh_concurrency: 4,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                  |
    /// |------------------------------|------------------------------------------|
    /// | `HOST`                       | `0.0.0.0`                                |
    /// | `PORT`                       | `3000`                                   |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`                  |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                                     |
    /// | `PROFILE_SOURCE_URL`         | `https://apps.runescape.com/runemetrics` |
    /// | `PROFILE_FETCH_TIMEOUT_SECS` | `10`                                     |
    /// | `PROFILE_ACTIVITY_LIMIT`     | `20`                                     |
    /// | `FRESHNESS_WINDOW_SECS`      | `900`                                    |
    /// | `MANUAL_COOLDOWN_SECS`       | `300`                                    |
    /// | `CACHE_TTL_SECS`             | `86400`                                  |
    /// | `CACHE_BACKEND`              | `postgres` (or `memory`)                 |
    /// | `AUTO_REFRESH_INTERVAL_SECS` | `3600`                                   |
    /// | `AUTO_REFRESH_CONCURRENCY`   | `4`                                      |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let profile_source_url =
            std::env::var("PROFILE_SOURCE_URL").unwrap_or(defaults.profile_source_url);

        let cache_backend = match std::env::var("CACHE_BACKEND") {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "postgres" => CacheBackend::Postgres,
                "memory" => CacheBackend::Memory,
                other => panic!("CACHE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
            },
            Err(_) => defaults.cache_backend,
        };

        Self {
            host,
            port: env_or("PORT", defaults.port),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            profile_source_url,
            profile_fetch_timeout_secs: env_or(
                "PROFILE_FETCH_TIMEOUT_SECS",
                defaults.profile_fetch_timeout_secs,
            ),
            profile_activity_limit: env_or("PROFILE_ACTIVITY_LIMIT", defaults.profile_activity_limit),
            freshness_window_secs: env_or("FRESHNESS_WINDOW_SECS", defaults.freshness_window_secs),
            manual_cooldown_secs: env_or("MANUAL_COOLDOWN_SECS", defaults.manual_cooldown_secs),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_backend,
            auto_refresh_interval_secs: env_or(
                "AUTO_REFRESH_INTERVAL_SECS",
                defaults.auto_refresh_interval_secs,
            ),
            auto_refresh_concurrency: env_or(
                "AUTO_REFRESH_CONCURRENCY",
                defaults.auto_refresh_concurrency,
            )
            .max(1),
        }
    }

    /// The coordinator's cooldowns.
    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            auto_window: Duration::from_secs(self.freshness_window_secs),
            manual_cooldown: Duration::from_secs(self.manual_cooldown_secs),
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
