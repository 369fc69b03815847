//! Econ Proxy - A caching proxy for economic data APIs
//!
//! Forwards requests to World Bank, FRED, OECD and Eurostat, reshapes a few
//! of their responses and keeps upstream answers in a bounded TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod transform;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use error::{ProxyError, Result};
