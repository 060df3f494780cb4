// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream property values as received, before normalization.
//!
//! The configuration server may emit any JSON shape, and embedding hosts may
//! hand in native values (timestamps, byte buffers, ...). [`RawValue`] models
//! all of them explicitly so normalization is an exhaustive match rather than
//! runtime type probing.

use crate::domain::normalized_value::NormalizedValue;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Any value a property source entry can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// An absent value
    Undefined,
    /// JSON `null`
    Null,
    /// A boolean
    Bool(bool),
    /// A number, possibly non-finite
    Number(f64),
    /// A string
    String(String),
    /// An ordered list
    Array(Vec<RawValue>),
    /// A keyed structure
    Object(BTreeMap<String, RawValue>),
    /// A point in time
    DateTime(DateTime<Utc>),
    /// Raw bytes
    Binary(Vec<u8>),
    /// A regular expression with its flags
    Pattern {
        /// The expression source
        source: String,
        /// The flags, e.g. `"gi"`
        flags: String,
    },
    /// An error value
    Error {
        /// The error message
        message: String,
    },
    /// A callable value
    Function,
}

impl RawValue {
    /// Returns `true` for values that normalize to themselves.
    pub fn is_primitive(&self) -> bool {
        match self {
            RawValue::Null | RawValue::Bool(_) | RawValue::String(_) => true,
            RawValue::Number(n) => n.is_finite(),
            _ => false,
        }
    }

    /// Builds an object value from key/value pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgresolve::domain::RawValue;
    ///
    /// let value = RawValue::object([("host", RawValue::from("db")), ("port", RawValue::from(5432))]);
    /// assert!(matches!(value, RawValue::Object(ref map) if map.len() == 2));
    /// ```
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RawValue)>,
    {
        RawValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            // serde_json numbers are always representable as f64
            serde_json::Value::Number(n) => RawValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => RawValue::String(s),
            serde_json::Value::Array(items) => {
                RawValue::Array(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                RawValue::Object(map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect())
            }
        }
    }
}

impl From<NormalizedValue> for RawValue {
    fn from(value: NormalizedValue) -> Self {
        match value {
            NormalizedValue::Null => RawValue::Null,
            NormalizedValue::Bool(b) => RawValue::Bool(b),
            NormalizedValue::Number(n) => RawValue::Number(n),
            NormalizedValue::String(s) => RawValue::String(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::Array(items)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(at: DateTime<Utc>) -> Self {
        RawValue::DateTime(at)
    }
}
