//! Upstream Module
//!
//! Network access to the third-party data APIs and the cache in front of it.

mod fetcher;
mod transport;

pub use fetcher::CachedFetcher;
pub use transport::{HttpTransport, Transport, UpstreamResponse};

/// World Bank v2 API root.
pub const WORLD_BANK_BASE: &str = "https://api.worldbank.org/v2";

/// FRED series observations endpoint.
pub const FRED_OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// URL of the World Bank indicator series for one country.
pub fn world_bank_indicator_url(country: &str, indicator: &str) -> String {
    format!(
        "{}/country/{}/indicator/{}",
        WORLD_BANK_BASE, country, indicator
    )
}
