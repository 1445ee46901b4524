//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL_SECS};
use crate::draft::DEFAULT_QUIET_PERIOD_MS;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for cached values
    pub default_ttl: u64,
    /// Interval in seconds between sweeps of expired entries
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Autosave quiet period in milliseconds
    pub autosave_quiet_ms: u64,
    /// TTL in seconds for cached draft lookups
    pub draft_cache_ttl: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_SECS` - Default cache TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL_SECS` - Expired-entry sweep frequency (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `AUTOSAVE_QUIET_MS` - Autosave debounce in milliseconds (default: 2000)
    /// - `DRAFT_CACHE_TTL_SECS` - Cached draft lookup TTL (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_or("DEFAULT_TTL_SECS", defaults.default_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            autosave_quiet_ms: env_or("AUTOSAVE_QUIET_MS", defaults.autosave_quiet_ms),
            draft_cache_ttl: env_or("DRAFT_CACHE_TTL_SECS", defaults.draft_cache_ttl),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Never shorter than one second; a zero interval would spin the sweep.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn autosave_quiet_period(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    pub fn draft_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.draft_cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
            server_port: 3000,
            autosave_quiet_ms: DEFAULT_QUIET_PERIOD_MS,
            draft_cache_ttl: 60,
        }
    }
}
