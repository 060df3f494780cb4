// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted result of a resolution.

use crate::domain::normalized_value::NormalizedValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder shown instead of a secret value by [`PersistableState::masked`].
pub const MASKED_VALUE: &str = "[secret]";

/// Normalized properties of one retained fragment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSource {
    /// The fragment name
    pub name: String,
    /// The fragment's normalized entries
    pub properties: BTreeMap<String, NormalizedValue>,
}

/// Everything a host persists after a successful resolution.
///
/// Every value is a [`NormalizedValue`], so the structure is at most two
/// levels deep. The password is never part of the state and the server URL is
/// stored with credentials masked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistableState {
    /// The merged properties, later fragments winning
    pub properties: BTreeMap<String, NormalizedValue>,
    /// The retained fragments in response order
    pub sources: Vec<NormalizedSource>,
    /// For each key, every fragment that supplied it, in order
    pub provenance: BTreeMap<String, Vec<String>>,
    /// Keys classified as sensitive
    pub secret_keys: BTreeSet<String>,
    /// The server URL, credentials masked
    pub config_server_url: String,
    /// The requested application
    pub application: String,
    /// The requested profile
    pub profile: String,
    /// The requested label
    pub label: Option<String>,
    /// Backend version reported by the server
    pub version: Option<String>,
    /// Backend state reported by the server
    pub state: Option<String>,
    /// Active profiles reported by the server
    pub profiles: Vec<String>,
}

impl PersistableState {
    /// Looks up a merged property.
    pub fn property(&self, key: &str) -> Option<&NormalizedValue> {
        self.properties.get(key)
    }

    /// Whether `key` was classified as sensitive.
    pub fn is_secret(&self, key: &str) -> bool {
        self.secret_keys.contains(key)
    }

    /// The fragment whose value won for `key`.
    pub fn winning_source(&self, key: &str) -> Option<&str> {
        self.provenance
            .get(key)
            .and_then(|names| names.last())
            .map(String::as_str)
    }

    /// The merged properties that were classified as sensitive.
    pub fn secret_properties(&self) -> BTreeMap<&str, &NormalizedValue> {
        self.properties
            .iter()
            .filter(|(key, _)| self.is_secret(key))
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }

    /// A copy whose sensitive values are replaced with [`MASKED_VALUE`].
    ///
    /// Masking applies to the merged map and to every fragment, so the copy
    /// is safe to print.
    pub fn masked(&self) -> Self {
        let mask = |properties: &BTreeMap<String, NormalizedValue>| -> BTreeMap<String, NormalizedValue> {
            properties
                .iter()
                .map(|(key, value)| {
                    let value = if self.is_secret(key) {
                        NormalizedValue::from(MASKED_VALUE)
                    } else {
                        value.clone()
                    };
                    (key.clone(), value)
                })
                .collect()
        };
        Self {
            properties: mask(&self.properties),
            sources: self
                .sources
                .iter()
                .map(|source| NormalizedSource {
                    name: source.name.clone(),
                    properties: mask(&source.properties),
                })
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PersistableState {
        let mut properties = BTreeMap::new();
        properties.insert("db.host".to_string(), NormalizedValue::from("db"));
        properties.insert("db.password".to_string(), NormalizedValue::from("s3cr3t"));
        let mut provenance = BTreeMap::new();
        provenance.insert("db.host".to_string(), vec!["a".to_string(), "b".to_string()]);
        provenance.insert("db.password".to_string(), vec!["b".to_string()]);
        PersistableState {
            sources: vec![NormalizedSource {
                name: "b".to_string(),
                properties: properties.clone(),
            }],
            properties,
            provenance,
            secret_keys: ["db.password".to_string()].into_iter().collect(),
            config_server_url: "http://config".to_string(),
            application: "orders".to_string(),
            profile: "prod".to_string(),
            label: None,
            version: Some("abc".to_string()),
            state: None,
            profiles: vec!["prod".to_string()],
        }
    }

    #[test]
    fn test_accessors() {
        let state = state();
        assert_eq!(state.property("db.host"), Some(&NormalizedValue::from("db")));
        assert!(state.is_secret("db.password"));
        assert!(!state.is_secret("db.host"));
        assert_eq!(state.winning_source("db.host"), Some("b"));
        assert_eq!(state.secret_properties().len(), 1);
    }

    #[test]
    fn test_masked_hides_secret_values() {
        let masked = state().masked();
        assert_eq!(
            masked.property("db.password"),
            Some(&NormalizedValue::from(MASKED_VALUE))
        );
        assert_eq!(masked.property("db.host"), Some(&NormalizedValue::from("db")));
        let json = serde_json::to_string(&masked).unwrap();
        assert!(!json.contains("s3cr3t"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(state()).unwrap();
        assert!(json.get("secretKeys").is_some());
        assert!(json.get("configServerUrl").is_some());
        assert_eq!(json["properties"]["db.host"], "db");
    }

    #[test]
    fn test_integral_numbers_survive_round_trip() {
        let mut state = state();
        state
            .properties
            .insert("server.port".to_string(), NormalizedValue::Number(8080.0));
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"server.port\":8080"), "{}", json);
        assert!(!json.contains("8080.0"));

        let back: PersistableState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }
}
