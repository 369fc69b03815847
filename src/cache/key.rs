//! Cache key derivation.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

// == Cache Key ==
/// Derives the cache key for an upstream request.
///
/// The key is the URL followed by the JSON object of its query parameters
/// with names in sorted order, so the same parameter set always maps to the
/// same key regardless of the order the caller listed it in. A repeated name
/// keeps its last value. No parameters serialize as `{}`.
pub fn cache_key(url: &str, params: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<&str, &str> = params.iter().copied().collect();
    let canonical: Map<String, Value> = sorted
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    format!("{}{}", url, Value::Object(canonical))
}
