//! Configuration Module
//!
//! Loads the process-wide settings once at start-up. Nothing below `main`
//! reads the environment; components receive the values they need.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Origins allowed when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origins allowed to call the API from a browser, `*` means any
    pub cors_origins: Vec<String>,
    /// FRED API key, `None` when unset or empty
    pub fred_api_key: Option<String>,
    /// Maximum number of upstream responses held in the cache
    pub cache_max_entries: usize,
    /// Lifetime of a cached upstream response in seconds
    pub cache_ttl: u64,
    /// Timeout for a single upstream request in seconds
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Human readable service name
    pub app_name: String,
    /// Service version reported by `GET /`
    pub app_version: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CORS_ORIGINS` - Comma separated origins (default: localhost:5173 pair)
    /// - `ENVIRONMENT` - `development` additionally allows any origin
    /// - `FRED_API_KEY` - FRED API key (default: unset)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 256)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 1800)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 30)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `APP_NAME` - Service name (default: "Econ Data Proxy")
    /// - `APP_VERSION` - Service version (default: crate version)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );
        if lookup("ENVIRONMENT").as_deref() == Some("development")
            && !cors_origins.iter().any(|o| o == "*")
        {
            cors_origins.push("*".to_string());
        }

        Self {
            cors_origins,
            fred_api_key: lookup("FRED_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_SIZE")
                .unwrap_or(defaults.cache_max_entries),
            cache_ttl: parse_var(&lookup, "CACHE_TTL").unwrap_or(defaults.cache_ttl),
            upstream_timeout: parse_var(&lookup, "UPSTREAM_TIMEOUT")
                .unwrap_or(defaults.upstream_timeout),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            app_name: lookup("APP_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.app_name),
            app_version: lookup("APP_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.app_version),
        }
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Upstream timeout as a Duration.
    pub fn upstream_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Service identifier derived from the app name ("Econ Data Proxy" -> "econ-data-proxy").
    pub fn service_slug(&self) -> String {
        self.app_name.to_lowercase().replace(' ', "-")
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            fred_api_key: None,
            cache_max_entries: 256,
            cache_ttl: 1800,
            upstream_timeout: 30,
            server_port: 8000,
            app_name: "Econ Data Proxy".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
