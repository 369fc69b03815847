//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;

use super::handlers::{
    eurostat_raw_handler, example_data_handler, external_data_handler, fred_series_handler,
    health_handler, oecd_raw_handler, process_handler, root_handler, stats_handler,
    worldbank_indicator_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /healthz` - Health check
/// - `GET /` - Service metadata
/// - `GET /api/worldbank/indicator` - Reshaped World Bank indicator series
/// - `GET /api/fred/series` - FRED observations with numeric values
/// - `GET /api/oecd/raw`, `GET /api/eurostat/raw` - Upstream JSON pass-through
/// - `GET /api/example/data` - Static sample rows
/// - `GET /api/example/external` - Pass-through wrapped with its source URL
/// - `POST /api/example/process` - Echo with a processed flag
/// - `GET /api/cache/stats` - Upstream cache statistics
///
/// # Middleware
/// - CORS: origins from the configuration
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/", get(root_handler))
        .route("/api/worldbank/indicator", get(worldbank_indicator_handler))
        .route("/api/fred/series", get(fred_series_handler))
        .route("/api/oecd/raw", get(oecd_raw_handler))
        .route("/api/eurostat/raw", get(eurostat_raw_handler))
        .route("/api/example/data", get(example_data_handler))
        .route("/api/example/external", get(external_data_handler))
        .route("/api/example/process", post(process_handler))
        .route("/api/cache/stats", get(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS policy.
///
/// A `*` entry opens the API to every origin without credentials. Otherwise
/// only the listed origins are allowed, with credentials, and the requested
/// methods and headers are mirrored back.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
