//! Response DTOs for the site cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of live entries
    pub size: usize,
    /// Keys of the live entries
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            size: stats.size,
            keys: stats.keys,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate,
        }
    }
}

/// Response body for invalidation and clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human readable summary
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} cache entries", removed),
            removed,
        }
    }
}

/// Response body for POST /drafts/complete
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
