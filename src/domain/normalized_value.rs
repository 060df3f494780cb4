// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-safe property values with type-safe conversions.
//!
//! This module provides the `NormalizedValue` type, the closed set of
//! primitives every resolved property is reduced to, together with conversion
//! methods to common Rust types.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest integer an `f64` holds exactly.
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A resolved property value: string, finite number, boolean or null.
///
/// Serializes as the bare JSON primitive, so a map of normalized values is a
/// flat JSON object. Integral numbers are written without a fraction.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::NormalizedValue;
///
/// let value = NormalizedValue::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert_eq!(value.as_i64("server.port").unwrap(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    /// A boolean
    Bool(bool),
    /// A finite number
    Number(f64),
    /// A string
    String(String),
    /// Null
    Null,
}

impl NormalizedValue {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, NormalizedValue::Null)
    }

    /// Converts the value to a boolean.
    ///
    /// Strings are recognized case-insensitively:
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgresolve::domain::NormalizedValue;
    ///
    /// assert!(NormalizedValue::from("yes").as_bool("feature.enabled").unwrap());
    /// assert!(!NormalizedValue::Bool(false).as_bool("feature.enabled").unwrap());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        if let NormalizedValue::Bool(b) = self {
            return Ok(*b);
        }
        let text = self.to_string();
        match text.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => text
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i64`.
    ///
    /// Integral numbers convert directly; strings are parsed.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            NormalizedValue::Number(n)
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 =>
            {
                Ok(*n as i64)
            }
            _ => self
                .to_string()
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
        }
    }

    /// Converts the value to a `u16`, handy for ports.
    pub fn as_u16(&self, key: &str) -> Result<u16> {
        let wide = self.as_i64(key)?;
        u16::try_from(wide).map_err(|e| ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: "u16".to_string(),
            source: Box::new(e),
        })
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            NormalizedValue::Number(n) => Ok(*n),
            _ => self
                .to_string()
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
        }
    }

    /// Parses the value's string form into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgresolve::domain::NormalizedValue;
    /// use std::net::IpAddr;
    ///
    /// let value = NormalizedValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("database.address").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.to_string()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NormalizedValue::Bool(b) => serializer.serialize_bool(*b),
            NormalizedValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            NormalizedValue::Number(n) => serializer.serialize_f64(*n),
            NormalizedValue::String(s) => serializer.serialize_str(s),
            NormalizedValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<String> for NormalizedValue {
    fn from(s: String) -> Self {
        NormalizedValue::String(s)
    }
}

impl From<&str> for NormalizedValue {
    fn from(s: &str) -> Self {
        NormalizedValue::String(s.to_string())
    }
}

impl From<bool> for NormalizedValue {
    fn from(b: bool) -> Self {
        NormalizedValue::Bool(b)
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::String(s) => write!(f, "{}", s),
            NormalizedValue::Number(n) => write!(f, "{}", n),
            NormalizedValue::Bool(b) => write!(f, "{}", b),
            NormalizedValue::Null => Ok(()),
        }
    }
}
