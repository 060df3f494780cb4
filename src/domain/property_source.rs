// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property sources and the configuration server response.
//!
//! A [`ConfigurationResponse`] is decoded once per resolution from the
//! server's JSON document and is not modified afterwards. Its `sources` keep
//! the server's order, which decides merge precedence.

use crate::domain::raw_value::RawValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named bag of properties returned by the configuration server.
///
/// The value type is generic so the same shape carries raw upstream values
/// and their normalized counterparts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySource<V = RawValue> {
    /// The fragment name, e.g. `git:main:application.yml` or `vault:secret/app`
    pub name: String,
    /// The properties this fragment defines
    pub entries: BTreeMap<String, V>,
}

impl<V> PropertySource<V> {
    /// Creates an empty property source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry, returning the source for chaining.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgresolve::domain::PropertySource;
    ///
    /// let source: PropertySource = PropertySource::new("file:application.yml")
    ///     .with_entry("database.host", "localhost")
    ///     .with_entry("database.port", 5432);
    /// assert_eq!(source.entries.len(), 2);
    /// ```
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<V>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }
}

/// The decoded answer to `GET {base}/{application}/{profile}[/{label}]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationResponse {
    /// The application name echoed by the server
    pub name: String,
    /// The active profiles
    pub profiles: Vec<String>,
    /// The resolved label (branch, tag, ...)
    pub label: Option<String>,
    /// The backend version (e.g. a commit id)
    pub version: Option<String>,
    /// Opaque backend state
    pub state: Option<String>,
    /// Property sources in precedence order, lowest first
    pub sources: Vec<PropertySource>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    profiles: Vec<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    property_sources: Vec<WirePropertySource>,
}

#[derive(Deserialize)]
struct WirePropertySource {
    name: String,
    #[serde(default)]
    source: serde_json::Map<String, serde_json::Value>,
}

impl ConfigurationResponse {
    /// Decodes the server's JSON document.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgresolve::domain::ConfigurationResponse;
    ///
    /// let body = r#"{
    ///     "name": "basic-app",
    ///     "profiles": ["development"],
    ///     "label": null,
    ///     "version": "abc123",
    ///     "propertySources": [
    ///         {"name": "file:application.yml", "source": {"server.port": 8080}}
    ///     ]
    /// }"#;
    /// let response = ConfigurationResponse::from_json(body).unwrap();
    /// assert_eq!(response.sources.len(), 1);
    /// assert_eq!(response.version.as_deref(), Some("abc123"));
    /// ```
    pub fn from_json(body: &str) -> std::result::Result<Self, serde_json::Error> {
        let wire: WireResponse = serde_json::from_str(body)?;
        Ok(Self {
            name: wire.name,
            profiles: wire.profiles,
            label: wire.label,
            version: wire.version,
            state: wire.state,
            sources: wire
                .property_sources
                .into_iter()
                .map(|source| PropertySource {
                    name: source.name,
                    entries: source
                        .source
                        .into_iter()
                        .map(|(key, value)| (key, RawValue::from(value)))
                        .collect(),
                })
                .collect(),
        })
    }

    /// Creates a response with the given sources and no metadata.
    pub fn with_sources(name: impl Into<String>, sources: Vec<PropertySource>) -> Self {
        Self {
            name: name.into(),
            profiles: Vec::new(),
            label: None,
            version: None,
            state: None,
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_sources_in_order() {
        let body = r#"{
            "name": "basic-app",
            "profiles": ["development"],
            "label": "main",
            "version": null,
            "state": null,
            "propertySources": [
                {"name": "first", "source": {"a": 1}},
                {"name": "second", "source": {"a": 2, "b": [1, 2]}}
            ]
        }"#;
        let response = ConfigurationResponse::from_json(body).unwrap();
        assert_eq!(response.name, "basic-app");
        assert_eq!(response.profiles, vec!["development"]);
        assert_eq!(response.label.as_deref(), Some("main"));
        let names: Vec<&str> = response.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(response.sources[1].get("a"), Some(&RawValue::Number(2.0)));
    }

    #[test]
    fn test_missing_property_sources_is_empty() {
        let response = ConfigurationResponse::from_json(r#"{"name": "app"}"#).unwrap();
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_rejects_non_document() {
        assert!(ConfigurationResponse::from_json("<html>oops</html>").is_err());
        assert!(ConfigurationResponse::from_json(r#"{"propertySources": {}}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let source: PropertySource = PropertySource::new("vault:secret/app")
            .with_entry("db.password", "s3cr3t")
            .with_entry("enabled", true);
        assert_eq!(source.get("enabled"), Some(&RawValue::Bool(true)));
        assert!(source.get("missing").is_none());
    }
}
