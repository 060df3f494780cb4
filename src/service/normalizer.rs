// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value normalization.
//!
//! Every [`RawValue`] is reduced to a [`NormalizedValue`]. Primitives pass
//! through, native values get a canonical string form, and arrays and objects
//! are JSON-encoded. The mapping is total, deterministic and idempotent.

use crate::domain::normalized_value::MAX_SAFE_INTEGER;
use crate::domain::{NormalizedValue, PropertySource, RawValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Output for callables.
pub const FUNCTION_MARKER: &str = "[Function]";

/// Output for structures that cannot be JSON-encoded.
pub const UNSERIALIZABLE_MARKER: &str = "[Unserializable Object]";

/// Reduces any value to a storage-safe primitive.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::{NormalizedValue, RawValue};
/// use cfgresolve::service::normalizer::normalize;
///
/// assert_eq!(normalize(&RawValue::Number(f64::NAN)), NormalizedValue::Null);
/// let list = RawValue::Array(vec![RawValue::from(1), RawValue::from(2), RawValue::from(3)]);
/// assert_eq!(normalize(&list), NormalizedValue::from("[1,2,3]"));
/// ```
pub fn normalize(value: &RawValue) -> NormalizedValue {
    match value {
        RawValue::Undefined | RawValue::Null => NormalizedValue::Null,
        RawValue::Bool(b) => NormalizedValue::Bool(*b),
        RawValue::Number(n) if n.is_finite() => NormalizedValue::Number(*n),
        RawValue::Number(_) => NormalizedValue::Null,
        RawValue::String(s) => NormalizedValue::String(s.clone()),
        RawValue::DateTime(at) => NormalizedValue::String(iso_8601(at)),
        RawValue::Binary(bytes) => NormalizedValue::String(STANDARD.encode(bytes)),
        RawValue::Pattern { source, flags } => NormalizedValue::String(pattern(source, flags)),
        RawValue::Error { message } => NormalizedValue::String(message.clone()),
        RawValue::Function => NormalizedValue::from(FUNCTION_MARKER),
        RawValue::Array(_) | RawValue::Object(_) => {
            let encoded = to_json(value)
                .and_then(|json| serde_json::to_string(&json).ok())
                .unwrap_or_else(|| UNSERIALIZABLE_MARKER.to_string());
            NormalizedValue::String(encoded)
        }
    }
}

/// Normalizes every value of a map.
pub fn normalize_entries(entries: &BTreeMap<String, RawValue>) -> BTreeMap<String, NormalizedValue> {
    entries
        .iter()
        .map(|(key, value)| (key.clone(), normalize(value)))
        .collect()
}

/// Normalizes every value of a fragment, keeping its name.
pub fn normalize_source(source: &PropertySource) -> PropertySource<NormalizedValue> {
    PropertySource {
        name: source.name.clone(),
        entries: normalize_entries(&source.entries),
    }
}

/// Normalizes every fragment, keeping their order.
pub fn normalize_sources(sources: &[PropertySource]) -> Vec<PropertySource<NormalizedValue>> {
    sources.iter().map(normalize_source).collect()
}

fn iso_8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn pattern(source: &str, flags: &str) -> String {
    format!("/{}/{}", source, flags)
}

fn json_number(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// The JSON form of a nested value; `None` means "leave it out".
fn to_json(value: &RawValue) -> Option<Value> {
    Some(match value {
        RawValue::Undefined | RawValue::Function => return None,
        RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Number(n) => json_number(*n),
        RawValue::String(s) => Value::String(s.clone()),
        RawValue::DateTime(at) => Value::String(iso_8601(at)),
        RawValue::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
        RawValue::Pattern { source, flags } => Value::String(pattern(source, flags)),
        RawValue::Error { message } => Value::String(message.clone()),
        RawValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| to_json(item).unwrap_or(Value::Null))
                .collect(),
        ),
        RawValue::Object(fields) => Value::Object(
            fields
                .iter()
                .filter_map(|(key, field)| to_json(field).map(|json| (key.clone(), json)))
                .collect::<Map<String, Value>>(),
        ),
    })
}
