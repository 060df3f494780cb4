// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property source aggregation.
//!
//! Fragments arrive lowest precedence first. Merging walks them in that order
//! so a later fragment overwrites an earlier one, while the provenance index
//! records every fragment that supplied a key, winner or not.

use crate::domain::PropertySource;
use crate::ports::{Diagnostic, DiagnosticSink};
use std::collections::BTreeMap;

/// Merged properties, keyed by property name.
pub type FlatProperties<V> = BTreeMap<String, V>;

/// For each key, the names of every fragment that supplied it, in order.
pub type ProvenanceIndex = BTreeMap<String, Vec<String>>;

/// Keeps the fragments whose name contains any of `filter`, ignoring case.
///
/// `None` or an empty filter keeps everything. Relative order is preserved,
/// and an empty result is valid.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::PropertySource;
/// use cfgresolve::service::aggregator::filter_sources;
///
/// let sources: Vec<PropertySource> = vec![
///     PropertySource::new("file:application.yml"),
///     PropertySource::new("git:main:orders.yml"),
///     PropertySource::new("vault:secret/orders"),
/// ];
/// let filter = vec!["VAULT".to_string(), "git".to_string()];
/// let kept = filter_sources(sources, Some(&filter));
/// let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
/// assert_eq!(names, ["git:main:orders.yml", "vault:secret/orders"]);
/// ```
pub fn filter_sources<V>(
    sources: Vec<PropertySource<V>>,
    filter: Option<&[String]>,
) -> Vec<PropertySource<V>> {
    let needles = match filter {
        Some(filter) if !filter.is_empty() => lowercase_all(filter),
        _ => return sources,
    };
    sources
        .into_iter()
        .filter(|source| name_matches(&source.name, &needles))
        .collect()
}

/// Like [`filter_sources`], reporting [`Diagnostic::AllSourcesFiltered`]
/// when an active filter excludes every fragment the server returned.
pub fn filter_sources_with_diagnostics<V>(
    sources: Vec<PropertySource<V>>,
    filter: Option<&[String]>,
    diagnostics: &dyn DiagnosticSink,
) -> Vec<PropertySource<V>> {
    let available: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
    let kept = filter_sources(sources, filter);
    if kept.is_empty() && !available.is_empty() {
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            diagnostics.report(Diagnostic::AllSourcesFiltered {
                filter: filter.to_vec(),
                available,
            });
        }
    }
    kept
}

/// Merges fragments, later fragments winning.
pub fn flatten<V: Clone>(sources: &[PropertySource<V>]) -> FlatProperties<V> {
    let mut merged = FlatProperties::new();
    for source in sources {
        for (key, value) in &source.entries {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Lists, for each key, every fragment that supplied it.
pub fn build_provenance<V>(sources: &[PropertySource<V>]) -> ProvenanceIndex {
    let mut provenance = ProvenanceIndex::new();
    for source in sources {
        for key in source.entries.keys() {
            provenance
                .entry(key.clone())
                .or_default()
                .push(source.name.clone());
        }
    }
    provenance
}

/// The merged map together with its provenance.
///
/// Both maps always have the same key set.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation<V> {
    /// Merged properties
    pub properties: FlatProperties<V>,
    /// Contributing fragments per key
    pub provenance: ProvenanceIndex,
}

impl<V> Aggregation<V> {
    /// The fragment whose value won for `key`.
    pub fn winning_source(&self, key: &str) -> Option<&str> {
        self.provenance
            .get(key)
            .and_then(|names| names.last())
            .map(String::as_str)
    }

    /// Every fragment that supplied `key`, in order.
    pub fn contributors(&self, key: &str) -> &[String] {
        self.provenance.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of merged keys.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no fragment supplied any key.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Performs [`flatten`] and [`build_provenance`] in a single pass.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::{PropertySource, RawValue};
/// use cfgresolve::service::aggregator::aggregate;
///
/// let sources: Vec<PropertySource> = vec![
///     PropertySource::new("defaults").with_entry("db.host", "localhost"),
///     PropertySource::new("dev").with_entry("db.host", "dev-db"),
/// ];
/// let aggregation = aggregate(&sources);
/// assert_eq!(aggregation.properties["db.host"], RawValue::from("dev-db"));
/// assert_eq!(aggregation.contributors("db.host"), ["defaults", "dev"]);
/// assert_eq!(aggregation.winning_source("db.host"), Some("dev"));
/// ```
pub fn aggregate<V: Clone>(sources: &[PropertySource<V>]) -> Aggregation<V> {
    let mut properties = FlatProperties::new();
    let mut provenance = ProvenanceIndex::new();
    for source in sources {
        for (key, value) in &source.entries {
            properties.insert(key.clone(), value.clone());
            provenance
                .entry(key.clone())
                .or_default()
                .push(source.name.clone());
        }
    }
    Aggregation {
        properties,
        provenance,
    }
}

pub(crate) fn lowercase_all(needles: &[String]) -> Vec<String> {
    needles.iter().map(|n| n.to_lowercase()).collect()
}

/// `needles` must already be lowercase.
pub(crate) fn name_matches(name: &str, needles: &[String]) -> bool {
    let name = name.to_lowercase();
    needles.iter().any(|needle| name.contains(needle.as_str()))
}
