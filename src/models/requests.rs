//! Request DTOs for the proxy API
//!
//! Query-string parameters of each route, with their defaults and validation.

use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;

/// Country used when the caller does not pick one.
pub const DEFAULT_COUNTRY: &str = "FRA";
/// Indicator used when the caller does not pick one (GDP, current US$).
pub const DEFAULT_INDICATOR: &str = "NY.GDP.MKTP.CD";
/// Rows requested from the World Bank per page.
pub const DEFAULT_PER_PAGE: u32 = 1000;
/// Upper bound accepted for `per_page`.
pub const MAX_PER_PAGE: u32 = 20_000;

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_indicator() -> String {
    DEFAULT_INDICATOR.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Query for `GET /api/worldbank/indicator`
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorQuery {
    /// ISO3 country code, several may be joined with `;`
    #[serde(default = "default_country")]
    pub country: String,
    /// World Bank indicator code
    #[serde(default = "default_indicator")]
    pub indicator: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for IndicatorQuery {
    fn default() -> Self {
        Self {
            country: default_country(),
            indicator: default_indicator(),
            per_page: default_per_page(),
        }
    }
}

impl IndicatorQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let country_ok = !self.country.is_empty()
            && self.country.len() <= 64
            && self
                .country
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ';');
        if !country_ok {
            return Some(format!("Invalid country code: '{}'", self.country));
        }

        let indicator_ok = !self.indicator.is_empty()
            && self.indicator.len() <= 64
            && self
                .indicator
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
        if !indicator_ok {
            return Some(format!("Invalid indicator code: '{}'", self.indicator));
        }

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Some(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        None
    }
}

/// Query for `GET /api/fred/series`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FredSeriesQuery {
    pub series_id: Option<String>,
    /// Start of the real-time period, `YYYY-MM-DD`
    pub realtime_start: Option<String>,
    /// End of the real-time period, `YYYY-MM-DD`
    pub realtime_end: Option<String>,
}

impl FredSeriesQuery {
    /// Returns the trimmed series id or an error message.
    pub fn series_id(&self) -> Result<&str, String> {
        let id = self.series_id.as_deref().map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err("series_id is required".to_string());
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("Invalid series_id: '{}'", id));
        }
        Ok(id)
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Err(msg) = self.series_id() {
            return Some(msg);
        }

        let start = match parse_date("realtime_start", self.realtime_start.as_deref()) {
            Ok(d) => d,
            Err(msg) => return Some(msg),
        };
        let end = match parse_date("realtime_end", self.realtime_end.as_deref()) {
            Ok(d) => d,
            Err(msg) => return Some(msg),
        };

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Some("realtime_start must not be after realtime_end".to_string());
            }
        }
        None
    }
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{} must be a YYYY-MM-DD date, got '{}'", name, s)),
    }
}

/// Query for the raw pass-through routes (`?url=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrlQuery {
    pub url: Option<String>,
}

impl RawUrlQuery {
    /// Returns the target URL if it is an absolute http(s) URL.
    pub fn target(&self) -> Result<Url, String> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| "url query parameter is required".to_string())?;

        let url = Url::parse(raw).map_err(|e| format!("Invalid url '{}': {}", raw, e))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(format!("Unsupported url scheme '{}'", other)),
        }
    }
}
