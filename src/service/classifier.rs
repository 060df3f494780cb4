// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret classification.
//!
//! A key is sensitive when its name matches the policy's key pattern, or when
//! any fragment that supplied it has a name containing one of the policy's
//! secret-source substrings. A caller-supplied override decides on its own.

use crate::domain::SecretPolicy;
use crate::service::aggregator::{lowercase_all, name_matches, FlatProperties, ProvenanceIndex};
use std::collections::BTreeMap;

/// Decides whether `key` is sensitive.
///
/// `provenance` is the list of fragments that supplied the key.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::SecretPolicy;
/// use cfgresolve::service::classifier::classify;
///
/// let policy = SecretPolicy::default().with_secret_sources(["vault"]);
/// assert!(classify("db.password", &[], &policy));
/// assert!(classify("db.host", &["vault:secret/app".to_string()], &policy));
/// assert!(!classify("db.host", &["git:main".to_string()], &policy));
/// ```
pub fn classify(key: &str, provenance: &[String], policy: &SecretPolicy) -> bool {
    pattern_signal(key, policy) || source_signal(provenance, &lowercase_all(policy.secret_sources()))
}

/// Like [`classify`], with `Some(decision)` taking precedence over both signals.
pub fn classify_with_override(
    key: &str,
    provenance: &[String],
    policy: &SecretPolicy,
    decision: Option<bool>,
) -> bool {
    match decision {
        Some(secret) => secret,
        None => classify(key, provenance, policy),
    }
}

/// The entries of `properties` classified as sensitive.
///
/// Empty when the policy has both signals disabled.
pub fn collect_secrets<V: Clone>(
    properties: &FlatProperties<V>,
    provenance: &ProvenanceIndex,
    policy: &SecretPolicy,
) -> FlatProperties<V> {
    collect_secrets_with_overrides(properties, provenance, policy, &BTreeMap::new())
}

/// Like [`collect_secrets`], honouring per-key overrides.
///
/// Overrides for keys absent from `properties` are ignored.
pub fn collect_secrets_with_overrides<V: Clone>(
    properties: &FlatProperties<V>,
    provenance: &ProvenanceIndex,
    policy: &SecretPolicy,
    overrides: &BTreeMap<String, bool>,
) -> FlatProperties<V> {
    let secret_sources = lowercase_all(policy.secret_sources());
    properties
        .iter()
        .filter(|(key, _)| match overrides.get(key.as_str()) {
            Some(secret) => *secret,
            None => {
                let contributors = provenance.get(key.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                pattern_signal(key, policy) || source_signal(contributors, &secret_sources)
            }
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn pattern_signal(key: &str, policy: &SecretPolicy) -> bool {
    policy
        .key_pattern()
        .map(|pattern| pattern.is_match(key))
        .unwrap_or(false)
}

fn source_signal(provenance: &[String], secret_sources: &[String]) -> bool {
    !secret_sources.is_empty() && provenance.iter().any(|name| name_matches(name, secret_sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NormalizedValue, PropertySource};
    use crate::service::aggregator::aggregate;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_signal_is_case_insensitive() {
        let policy = SecretPolicy::default();
        assert!(classify("DB.PASSWORD", &[], &policy));
        assert!(classify("stripe.apiKey", &[], &policy));
        assert!(!classify("db.host", &[], &policy));
    }

    #[test]
    fn test_source_signal_needs_configured_sources() {
        let policy = SecretPolicy::default();
        assert!(!classify("db.host", &names(&["vault:secret/app"]), &policy));

        let policy = policy.with_secret_sources(["VAULT"]);
        assert!(classify("db.host", &names(&["git:main", "vault:secret/app"]), &policy));
    }

    #[test]
    fn test_source_signal_matches_any_contributor() {
        let policy = SecretPolicy::disabled().with_secret_sources(["vault"]);
        // vault supplied the key first, git overrode it
        assert!(classify("db.host", &names(&["vault:secret/app", "git:main"]), &policy));
    }

    #[test]
    fn test_override_short_circuits() {
        let policy = SecretPolicy::default();
        assert!(!classify_with_override("db.password", &[], &policy, Some(false)));
        assert!(classify_with_override("app.name", &[], &policy, Some(true)));
        assert!(classify_with_override("db.password", &[], &policy, None));
    }

    #[test]
    fn test_collect_secrets() {
        let sources: Vec<PropertySource<NormalizedValue>> = vec![
            PropertySource::new("git:main")
                .with_entry("db.host", "db")
                .with_entry("db.password", "pw"),
            PropertySource::new("vault:secret/app").with_entry("cert.pem", "---"),
        ];
        let aggregation = aggregate(&sources);
        let policy = SecretPolicy::default().with_secret_sources(["vault"]);
        let secrets = collect_secrets(&aggregation.properties, &aggregation.provenance, &policy);
        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets["cert.pem"], NormalizedValue::from("---"));
        assert_eq!(secrets["db.password"], NormalizedValue::from("pw"));
        assert!(!secrets.contains_key("db.host"));
    }

    #[test]
    fn test_collect_secrets_disabled_policy_is_empty() {
        let sources: Vec<PropertySource<NormalizedValue>> =
            vec![PropertySource::new("vault:x").with_entry("db.password", "pw")];
        let aggregation = aggregate(&sources);
        let secrets = collect_secrets(
            &aggregation.properties,
            &aggregation.provenance,
            &SecretPolicy::disabled(),
        );
        assert!(secrets.is_empty());
    }

    #[test]
    fn test_collect_secrets_with_overrides() {
        let sources: Vec<PropertySource<NormalizedValue>> = vec![PropertySource::new("git")
            .with_entry("db.password", "pw")
            .with_entry("app.name", "orders")];
        let aggregation = aggregate(&sources);
        let mut overrides = BTreeMap::new();
        overrides.insert("db.password".to_string(), false);
        overrides.insert("app.name".to_string(), true);
        overrides.insert("not.there".to_string(), true);
        let secrets = collect_secrets_with_overrides(
            &aggregation.properties,
            &aggregation.provenance,
            &SecretPolicy::default(),
            &overrides,
        );
        assert_eq!(secrets.keys().collect::<Vec<_>>(), ["app.name"]);
        assert_eq!(secrets["app.name"], NormalizedValue::from("orders"));
    }
}
