//! # Record Flattening
//!
//! Forecast records arrive as nested JSON objects (`swell.components.primary.period`,
//! `wind.speed`, ...). The display layer works on a single-level map instead,
//! keyed by the object path joined with [`SEPARATOR`]:
//!
//! ```text
//! {"swell": {"components": {"primary": {"period": 11}}}}
//!     -> {"swell_components_primary_period": 11}
//! ```
//!
//! The flattener is schema-aware rather than a general list flattener: nested
//! objects (including the four named swell components `combined`, `primary`,
//! `secondary`, `tertiary`) are descended into, scalars become leaves, and
//! arrays are skipped entirely. JSON `null` leaves are kept as `Value::Null` so
//! that "present but empty" stays distinguishable from "absent".

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ForecastError, Result};

/// Joins path segments in flattened keys.
pub const SEPARATOR: &str = "_";

/// Single-level view of one forecast record.
///
/// `BTreeMap` keeps iteration deterministic; key order carries no meaning.
pub type FlatForecast = BTreeMap<String, Value>;

/// Flatten one forecast record.
///
/// Fails with [`ForecastError::MalformedRecord`] only when `raw` is not a JSON
/// object. Flattening an already-flat object returns it unchanged.
///
/// # Example
/// ```
/// use msw_forecast::flatten::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"wind": {"speed": 8, "unit": "mph"}})).unwrap();
/// assert_eq!(flat["wind_speed"], json!(8));
/// assert_eq!(flat["wind_unit"], json!("mph"));
/// ```
pub fn flatten(raw: &Value) -> Result<FlatForecast> {
    match raw {
        Value::Object(map) => Ok(flatten_map(map)),
        other => Err(ForecastError::MalformedRecord(format!(
            "expected a JSON object, got {}",
            kind(other)
        ))),
    }
}

/// Flatten an object that is already known to be a mapping.
pub fn flatten_map(map: &Map<String, Value>) -> FlatForecast {
    let mut out = FlatForecast::new();
    descend(map, None, &mut out);
    out
}

fn descend(map: &Map<String, Value>, prefix: Option<&str>, out: &mut FlatForecast) {
    for (key, value) in map {
        let path = match prefix {
            Some(parent) => format!("{parent}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) => descend(child, Some(&path), out),
            Value::Array(items) => {
                debug!(key = %path, len = items.len(), "skipping list value while flattening");
            }
            scalar => {
                out.insert(path, scalar.clone());
            }
        }
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_record_is_flattened() {
        let raw = json!({
            "timestamp": 1662847200,
            "swell": {
                "unit": "ft",
                "components": {
                    "combined": {"height": 4, "period": 11, "compassDirection": "ENE"},
                    "primary": {"height": 3, "period": 11}
                }
            },
            "condition": {"pressure": 1014, "unitPressure": "mb"}
        });

        let flat = flatten(&raw).unwrap();
        assert_eq!(flat["timestamp"], json!(1662847200));
        assert_eq!(flat["swell_unit"], json!("ft"));
        assert_eq!(flat["swell_components_combined_period"], json!(11));
        assert_eq!(flat["swell_components_combined_compassDirection"], json!("ENE"));
        assert_eq!(flat["swell_components_primary_height"], json!(3));
        assert_eq!(flat["condition_unitPressure"], json!("mb"));
        assert_eq!(flat.len(), 9);
    }

    #[test]
    fn test_null_leaves_are_preserved() {
        let flat = flatten(&json!({"wind": {"chill": null}})).unwrap();
        assert_eq!(flat.get("wind_chill"), Some(&Value::Null));
    }

    #[test]
    fn test_lists_produce_no_entries() {
        let flat = flatten(&json!({"tags": [1, 2, 3], "swell": {"items": [{"a": 1}]}})).unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_flatten_is_idempotent_on_flat_input() {
        let raw = json!({"swell": {"probability": 100}, "wind": {"speed": 8}});
        let once = flatten(&raw).unwrap();

        let as_value = Value::Object(once.clone().into_iter().collect());
        let twice = flatten(&as_value).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_key_order_is_insignificant() {
        let a = flatten(&json!({"a": 1, "b": {"c": 2}})).unwrap();
        let b = flatten(&json!({"b": {"c": 2}, "a": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_object_input_is_malformed() {
        for raw in [json!([1, 2]), json!("text"), json!(null), json!(3)] {
            assert!(matches!(
                flatten(&raw),
                Err(ForecastError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn test_empty_object_flattens_to_empty_map() {
        assert!(flatten(&json!({})).unwrap().is_empty());
    }
}
