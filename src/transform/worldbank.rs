//! World Bank indicator reshaping
//!
//! The indicator API answers with `[metadata, observations]`. Only the
//! observations are kept, flattened to `{year, value}` rows in year order.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProxyError, Result};

/// One observation of an indicator series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub year: i32,
    /// Upstream value, passed through untouched (may be null)
    pub value: Value,
}

/// Reshaped indicator series returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub country: String,
    pub indicator: String,
    pub data: Vec<IndicatorRow>,
}

/// Converts a raw World Bank indicator response into an [`IndicatorSeries`].
///
/// Observations whose `date` is missing or not an integer year are dropped.
/// Rows are sorted by year with a stable sort, so duplicate years keep their
/// upstream order.
///
/// # Errors
/// [`ProxyError::UpstreamShape`] when the document is not an array of at least
/// two elements whose second element is an array.
pub fn reshape_indicator(country: &str, indicator: &str, raw: &Value) -> Result<IndicatorSeries> {
    let envelope = raw
        .as_array()
        .filter(|parts| parts.len() >= 2)
        .ok_or_else(|| {
            ProxyError::UpstreamShape(
                "World Bank response is not a [metadata, data] array".to_string(),
            )
        })?;

    let observations: &[Value] = match &envelope[1] {
        Value::Array(items) => items.as_slice(),
        // The API sends null instead of an empty list when nothing matches
        Value::Null => &[],
        _ => {
            return Err(ProxyError::UpstreamShape(
                "World Bank data element is not an array".to_string(),
            ))
        }
    };

    let mut data: Vec<IndicatorRow> = observations
        .iter()
        .filter_map(|obs| {
            let year = obs.get("date").and_then(parse_year)?;
            let value = obs.get("value").cloned().unwrap_or(Value::Null);
            Some(IndicatorRow { year, value })
        })
        .collect();

    data.sort_by_key(|row| row.year);

    Ok(IndicatorSeries {
        country: country.to_string(),
        indicator: indicator.to_string(),
        data,
    })
}

fn parse_year(date: &Value) -> Option<i32> {
    match date {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        _ => None,
    }
}
