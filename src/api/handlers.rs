//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint. Handlers validate their
//! query, call the cached fetch layer and shape the answer; they hold no
//! state of their own.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{
    ExampleDataResponse, ExternalDataResponse, FredSeriesQuery, HealthResponse, IndicatorQuery,
    ProcessResponse, RawUrlQuery, ServiceInfo, StatsResponse,
};
use crate::transform::{reshape_indicator, reshape_observations, FredSeries, IndicatorSeries};
use crate::upstream::{
    world_bank_indicator_url, CachedFetcher, HttpTransport, Transport, FRED_OBSERVATIONS_URL,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached access to upstream APIs
    pub fetcher: CachedFetcher,
    /// Start-up configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState using the given transport for upstream calls.
    ///
    /// The cache is sized from the configuration.
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        let cache = CacheStore::new(config.cache_max_entries, config.cache_ttl_duration());
        Self {
            fetcher: CachedFetcher::new(cache, transport),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState that talks to the real upstream APIs.
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.upstream_timeout_duration())?;
        Ok(Self::new(config, Arc::new(transport)))
    }
}

/// Handler for GET /healthz
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.config.service_slug()))
}

/// Handler for GET /
pub async fn root_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::from_config(&state.config))
}

/// Handler for GET /api/worldbank/indicator
///
/// Fetches an indicator series and reshapes it into sorted `{year, value}` rows.
pub async fn worldbank_indicator_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<IndicatorQuery>, QueryRejection>,
) -> Result<Json<IndicatorSeries>> {
    let Query(query) = query?;
    if let Some(error_msg) = query.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let url = world_bank_indicator_url(&query.country, &query.indicator);
    let per_page = query.per_page.to_string();
    let raw = state
        .fetcher
        .fetch_json(&url, &[("format", "json"), ("per_page", &per_page)])
        .await?;

    let series = reshape_indicator(&query.country, &query.indicator, &raw)?;
    Ok(Json(series))
}

/// Handler for GET /api/fred/series
///
/// Requires a configured FRED API key; without one the request is rejected
/// before anything is sent upstream.
pub async fn fred_series_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<FredSeriesQuery>, QueryRejection>,
) -> Result<Json<FredSeries>> {
    let api_key = state
        .config
        .fred_api_key
        .as_deref()
        .ok_or_else(|| ProxyError::ClientConfig("FRED_API_KEY is not configured".to_string()))?;

    let Query(query) = query?;
    if let Some(error_msg) = query.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }
    let series_id = query.series_id().map_err(ProxyError::InvalidRequest)?;

    let mut params = vec![
        ("series_id", series_id),
        ("api_key", api_key),
        ("file_type", "json"),
    ];
    if let Some(start) = query.realtime_start.as_deref() {
        params.push(("realtime_start", start));
    }
    if let Some(end) = query.realtime_end.as_deref() {
        params.push(("realtime_end", end));
    }

    let raw = state.fetcher.fetch_json(FRED_OBSERVATIONS_URL, &params).await?;
    Ok(Json(reshape_observations(series_id, &raw)?))
}

/// Handler for GET /api/oecd/raw
pub async fn oecd_raw_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<RawUrlQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    fetch_raw(&state, &query, "oecd").await.map(Json)
}

/// Handler for GET /api/eurostat/raw
pub async fn eurostat_raw_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<RawUrlQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    fetch_raw(&state, &query, "eurostat").await.map(Json)
}

/// Handler for GET /api/example/external
///
/// Same as the raw routes, wrapped together with the URL it came from.
pub async fn external_data_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<RawUrlQuery>, QueryRejection>,
) -> Result<Json<ExternalDataResponse>> {
    let Query(query) = query?;
    let data = fetch_raw(&state, &query, "external")
        .await
        .map_err(|e| match e {
            // Every failure of this route is reported as a failed fetch
            ProxyError::UpstreamFormat(_) | ProxyError::Internal(_) => {
                ProxyError::InvalidRequest(format!("Failed to fetch data: {}", e))
            }
            other => other,
        })?;

    Ok(Json(ExternalDataResponse {
        data,
        source: query.url.unwrap_or_default().trim().to_string(),
    }))
}

/// Fetches a caller supplied URL through the cache without reshaping.
async fn fetch_raw(state: &AppState, query: &RawUrlQuery, source: &str) -> Result<Value> {
    let target = query.target().map_err(ProxyError::InvalidRequest)?;
    info!(source, url = %target, "raw pass-through");

    state
        .fetcher
        .fetch_json(target.as_str(), &[])
        .await
        .map_err(ProxyError::into_unfetchable_url)
}

/// Handler for GET /api/example/data
pub async fn example_data_handler() -> Json<ExampleDataResponse> {
    Json(ExampleDataResponse::sample())
}

/// Handler for POST /api/example/process
///
/// Echoes the submitted object back, flagged as processed.
pub async fn process_handler(
    body: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<ProcessResponse>> {
    let Json(body) = body?;
    Ok(Json(ProcessResponse::new(body)))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.fetcher.cache_stats().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays one canned response and remembers every request it saw.
    struct RecordingTransport {
        status: u16,
        body: String,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl RecordingTransport {
        fn new(status: u16, body: Value) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<UpstreamResponse> {
            let params = params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.requests.lock().unwrap().push((url.to_string(), params));
            Ok(UpstreamResponse::new(self.status, self.body.clone()))
        }
    }

    fn state_with(config: Config, transport: Arc<RecordingTransport>) -> AppState {
        AppState::new(config, transport)
    }

    #[tokio::test]
    async fn test_worldbank_handler_builds_request_and_reshapes() {
        let transport = RecordingTransport::new(
            200,
            json!([{"page": 1}, [{"date": "2021", "value": 2.5}, {"date": "2020", "value": 1.5}]]),
        );
        let state = state_with(Config::default(), transport.clone());

        let response = worldbank_indicator_handler(State(state), Ok(Query(IndicatorQuery::default())))
            .await
            .unwrap();

        assert_eq!(response.country, "FRA");
        assert_eq!(response.data[0].year, 2020);
        assert_eq!(response.data[1].year, 2021);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].0,
            "https://api.worldbank.org/v2/country/FRA/indicator/NY.GDP.MKTP.CD"
        );
        assert!(requests[0].1.contains(&("format".to_string(), "json".to_string())));
        assert!(requests[0].1.contains(&("per_page".to_string(), "1000".to_string())));
    }

    #[tokio::test]
    async fn test_worldbank_handler_rejects_bad_country() {
        let transport = RecordingTransport::new(200, json!([]));
        let state = state_with(Config::default(), transport.clone());

        let query = IndicatorQuery {
            country: "F R A".to_string(),
            ..IndicatorQuery::default()
        };
        let result = worldbank_indicator_handler(State(state), Ok(Query(query))).await;

        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fred_handler_without_key_makes_no_request() {
        let transport = RecordingTransport::new(200, json!({"observations": []}));
        let state = state_with(Config::default(), transport.clone());

        let query = FredSeriesQuery {
            series_id: Some("GDP".to_string()),
            ..Default::default()
        };
        let result = fred_series_handler(State(state), Ok(Query(query))).await;

        assert!(matches!(result, Err(ProxyError::ClientConfig(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fred_handler_passes_key_and_period() {
        let transport = RecordingTransport::new(
            200,
            json!({"observations": [{"date": "2021-01-01", "value": "."}, {"date": "2021-04-01", "value": "3.2"}]}),
        );
        let config = Config {
            fred_api_key: Some("secret".to_string()),
            ..Config::default()
        };
        let state = state_with(config, transport.clone());

        let query = FredSeriesQuery {
            series_id: Some("GDP".to_string()),
            realtime_start: Some("2021-01-01".to_string()),
            realtime_end: None,
        };
        let response = fred_series_handler(State(state), Ok(Query(query))).await.unwrap();

        assert_eq!(response.series_id, "GDP");
        assert_eq!(response.observations[0].value, None);
        assert_eq!(response.observations[1].value, Some(3.2));

        let requests = transport.requests();
        let (url, params) = &requests[0];
        assert_eq!(url, FRED_OBSERVATIONS_URL);
        assert!(params.contains(&("api_key".to_string(), "secret".to_string())));
        assert!(params.contains(&("realtime_start".to_string(), "2021-01-01".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "realtime_end"));
    }

    #[tokio::test]
    async fn test_raw_handler_passes_json_through() {
        let upstream = json!({"dataSets": [{"series": {}}]});
        let transport = RecordingTransport::new(200, upstream.clone());
        let state = state_with(Config::default(), transport);

        let query = RawUrlQuery {
            url: Some("https://sdmx.oecd.org/public/rest/data/QNA".to_string()),
        };
        let response = oecd_raw_handler(State(state), Ok(Query(query))).await.unwrap();

        assert_eq!(response.0, upstream);
    }

    #[tokio::test]
    async fn test_raw_handler_upstream_error_is_client_error() {
        let transport = RecordingTransport::new(404, json!({"error": "missing"}));
        let state = state_with(Config::default(), transport);

        let query = RawUrlQuery {
            url: Some("https://ec.europa.eu/eurostat/api/nothing".to_string()),
        };
        let result = eurostat_raw_handler(State(state), Ok(Query(query))).await;

        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_external_handler_wraps_source() {
        let transport = RecordingTransport::new(200, json!([1, 2, 3]));
        let state = state_with(Config::default(), transport);

        let query = RawUrlQuery {
            url: Some("https://example.org/data.json".to_string()),
        };
        let response = external_data_handler(State(state), Ok(Query(query))).await.unwrap();

        assert_eq!(response.data, json!([1, 2, 3]));
        assert_eq!(response.source, "https://example.org/data.json");
    }

    #[tokio::test]
    async fn test_process_handler_echoes_body() {
        let mut body = Map::new();
        body.insert("x".to_string(), json!(42));

        let response = process_handler(Ok(Json(body))).await.unwrap();

        assert!(response.processed);
        assert_eq!(response.original["x"], 42);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = state_with(Config::default(), RecordingTransport::new(200, json!({})));
        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.service, "econ-data-proxy");
    }
}
