//! API Module
//!
//! HTTP handlers and routing for the proxy REST API.
//!
//! # Endpoints
//! - `GET /healthz` - Health check
//! - `GET /` - Service metadata
//! - `GET /api/worldbank/indicator` - World Bank indicator series
//! - `GET /api/fred/series` - FRED series observations
//! - `GET /api/oecd/raw` - OECD pass-through
//! - `GET /api/eurostat/raw` - Eurostat pass-through
//! - `GET /api/example/data` - Sample data
//! - `GET /api/example/external` - Generic pass-through
//! - `POST /api/example/process` - Echo
//! - `GET /api/cache/stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{cors_layer, create_router};
