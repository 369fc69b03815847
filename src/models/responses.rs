//! Response DTOs for the proxy API

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cache::CacheStats;
use crate::config::Config;

/// Response body for `GET /healthz`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Service identifier
    pub service: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok(service: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    /// Routes the service answers on
    pub docs: Vec<&'static str>,
    pub health: String,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            message: config.app_name.clone(),
            version: config.app_version.clone(),
            health: "/healthz".to_string(),
            docs: vec![
                "/api/worldbank/indicator",
                "/api/fred/series",
                "/api/oecd/raw",
                "/api/eurostat/raw",
                "/api/example/data",
                "/api/example/external",
                "/api/example/process",
                "/api/cache/stats",
            ],
        }
    }
}

/// A row of the static sample data set.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleItem {
    pub id: u32,
    pub name: String,
    pub value: i64,
}

/// Response body for `GET /api/example/data`
#[derive(Debug, Clone, Serialize)]
pub struct ExampleDataResponse {
    pub message: String,
    pub data: Vec<ExampleItem>,
}

impl ExampleDataResponse {
    pub fn sample() -> Self {
        Self {
            message: "This is example data from your API".to_string(),
            data: (1..=3)
                .map(|id| ExampleItem {
                    id,
                    name: format!("Item {}", id),
                    value: i64::from(id) * 100,
                })
                .collect(),
        }
    }
}

/// Response body for `GET /api/example/external`
#[derive(Debug, Clone, Serialize)]
pub struct ExternalDataResponse {
    /// Upstream JSON, unmodified
    pub data: Value,
    /// URL the data came from
    pub source: String,
}

/// Response body for `POST /api/example/process`
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub original: Map<String, Value>,
    pub processed: bool,
    pub timestamp: String,
}

impl ProcessResponse {
    pub fn new(original: Map<String, Value>) -> Self {
        Self {
            original,
            processed: true,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
