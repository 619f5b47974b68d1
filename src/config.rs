//! Server configuration read from the environment.
//!
//! `HOST` (default 0.0.0.0), `PORT` (default 8080), `TOURNAMENT_IDLE_HOURS` (default 12),
//! `CLEANUP_INTERVAL_MINUTES` (default 30). Unparsable or out-of-range values fall back to
//! the default.

use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tournaments not touched for this long are evicted with their schedule.
    pub idle_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            idle_timeout: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| -> Option<u64> { lookup(key).and_then(|v| v.trim().parse().ok()) };
        Self {
            host: lookup("HOST")
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            idle_timeout: parsed("TOURNAMENT_IDLE_HOURS")
                .and_then(|h| h.checked_mul(3600))
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            cleanup_interval: parsed("CLEANUP_INTERVAL_MINUTES")
                .filter(|m| *m > 0)
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}
