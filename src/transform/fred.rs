//! FRED observation reshaping

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProxyError, Result};

/// A single FRED observation with its value coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FredObservation {
    pub date: String,
    /// `None` for FRED's missing-value markers (`"."`, empty string)
    pub value: Option<f64>,
}

/// Reshaped FRED series returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FredSeries {
    pub series_id: String,
    pub observations: Vec<FredObservation>,
}

/// Converts a raw `series/observations` response into a [`FredSeries`].
///
/// # Errors
/// [`ProxyError::UpstreamShape`] when the document has no `observations` array.
pub fn reshape_observations(series_id: &str, raw: &Value) -> Result<FredSeries> {
    let observations = raw
        .get("observations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProxyError::UpstreamShape("FRED response has no observations array".to_string())
        })?;

    Ok(FredSeries {
        series_id: series_id.to_string(),
        observations: observations.iter().map(reshape_observation).collect(),
    })
}

/// Converts one upstream observation object.
pub fn reshape_observation(obs: &Value) -> FredObservation {
    FredObservation {
        date: obs
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        value: obs.get("value").and_then(coerce_value),
    }
}

fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_marker_maps_to_null() {
        let obs = reshape_observation(&json!({"date": "2021-01-01", "value": "."}));
        assert_eq!(
            serde_json::to_value(&obs).unwrap(),
            json!({"date": "2021-01-01", "value": null})
        );
    }

    #[test]
    fn test_numeric_string_maps_to_number() {
        let obs = reshape_observation(&json!({"value": "3.2"}));
        assert_eq!(obs.value, Some(3.2));
        assert_eq!(obs.date, "");
        assert_eq!(serde_json::to_value(&obs).unwrap()["value"], json!(3.2));
    }

    #[test]
    fn test_other_values() {
        assert_eq!(reshape_observation(&json!({"value": ""})).value, None);
        assert_eq!(reshape_observation(&json!({"value": null})).value, None);
        assert_eq!(reshape_observation(&json!({"value": "NaN"})).value, None);
        assert_eq!(reshape_observation(&json!({"value": 7})).value, Some(7.0));
        assert_eq!(reshape_observation(&json!({"value": "-0.5"})).value, Some(-0.5));
    }

    #[test]
    fn test_reshape_series() {
        let raw = json!({
            "realtime_start": "2024-01-01",
            "count": 2,
            "observations": [
                {"realtime_start": "2024-01-01", "date": "2020-01-01", "value": "21481.367"},
                {"realtime_start": "2024-01-01", "date": "2020-04-01", "value": "."}
            ]
        });

        let series = reshape_observations("GDP", &raw).unwrap();

        assert_eq!(series.series_id, "GDP");
        assert_eq!(series.observations.len(), 2);
        assert_eq!(series.observations[0].value, Some(21481.367));
        assert_eq!(series.observations[1].value, None);
    }

    #[test]
    fn test_missing_observations_is_shape_error() {
        let result = reshape_observations("GDP", &json!({"error_code": 400}));
        assert!(matches!(result, Err(ProxyError::UpstreamShape(_))));

        let result = reshape_observations("GDP", &json!([1, 2]));
        assert!(matches!(result, Err(ProxyError::UpstreamShape(_))));
    }
}
