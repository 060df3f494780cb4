// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration resolver implementation.
//!
//! This module provides the default implementation of the
//! `ConfigurationResolver` trait: fetch with retry, filter fragments,
//! normalize, merge with provenance, classify.

use crate::adapters::TracingSink;
use crate::domain::{
    ConfigurationResolver, ConfigurationResponse, NormalizedSource, PersistableState,
    ResolveInputs, Result,
};
use crate::ports::{ConfigTransport, Diagnostic, DiagnosticSink};
use crate::service::aggregator::{aggregate, filter_sources_with_diagnostics};
use crate::service::classifier::collect_secrets_with_overrides;
use crate::service::fetcher::ConfigFetcher;
use crate::service::normalizer::normalize_sources;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

/// Resolves configuration over a shared transport.
///
/// The resolver holds only immutable collaborators, so one instance can serve
/// concurrent resolutions.
///
/// # Examples
///
/// ```rust
/// use cfgresolve::domain::{ConfigurationResponse, PropertySource, ResolveInputs};
/// use cfgresolve::service::Resolver;
///
/// let response = ConfigurationResponse::with_sources(
///     "orders",
///     vec![PropertySource::new("git:main").with_entry("db.password", "pw")],
/// );
/// let inputs = ResolveInputs::new("http://config:8888", "orders", "prod");
/// let state = Resolver::resolve_response(&inputs, response).unwrap();
/// assert!(state.is_secret("db.password"));
/// ```
pub struct Resolver<T> {
    transport: Arc<T>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<T: ConfigTransport> Resolver<T> {
    /// Creates a resolver that reports diagnostics to `tracing`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    async fn run(&self, inputs: &ResolveInputs) -> Result<PersistableState> {
        inputs.validate()?;
        let fetcher = ConfigFetcher::new(Arc::clone(&self.transport), inputs.client_settings()?)
            .with_diagnostics(Arc::clone(&self.diagnostics));
        let response = fetcher
            .fetch_with_retry(
                &inputs.application,
                &inputs.profile,
                inputs.effective_label(),
                &inputs.retry,
            )
            .await?;
        build_state(inputs, response, self.diagnostics.as_ref())
    }
}

impl Resolver<()> {
    /// Builds the state from an already decoded response, without any I/O.
    ///
    /// The inputs are validated as for a network resolution.
    pub fn resolve_response(
        inputs: &ResolveInputs,
        response: ConfigurationResponse,
    ) -> Result<PersistableState> {
        inputs.validate()?;
        build_state(inputs, response, &TracingSink)
    }
}

#[cfg(feature = "http")]
impl Resolver<crate::adapters::HttpTransport> {
    /// Creates a resolver backed by the reqwest transport.
    pub fn http() -> Result<Self> {
        Ok(Self::new(crate::adapters::HttpTransport::new()?))
    }
}

impl<T: ConfigTransport> ConfigurationResolver for Resolver<T> {
    fn resolve(
        &self,
        inputs: &ResolveInputs,
    ) -> impl Future<Output = Result<PersistableState>> + Send {
        self.run(inputs)
    }
}

fn build_state(
    inputs: &ResolveInputs,
    response: ConfigurationResponse,
    diagnostics: &dyn DiagnosticSink,
) -> Result<PersistableState> {
    let policy = inputs.secret_policy()?;
    let settings = inputs.client_settings()?;

    let retained = filter_sources_with_diagnostics(
        response.sources,
        inputs.property_sources.as_deref(),
        diagnostics,
    );
    let normalized = normalize_sources(&retained);
    let aggregation = aggregate(&normalized);
    let secret_keys: BTreeSet<String> = collect_secrets_with_overrides(
        &aggregation.properties,
        &aggregation.provenance,
        &policy,
        &inputs.secret_overrides,
    )
    .into_keys()
    .collect();

    diagnostics.report(Diagnostic::Resolved {
        application: inputs.application.clone(),
        profile: inputs.profile.clone(),
        sources: normalized.len(),
        properties: aggregation.properties.len(),
        secrets: secret_keys.len(),
    });

    Ok(PersistableState {
        properties: aggregation.properties,
        provenance: aggregation.provenance,
        sources: normalized
            .into_iter()
            .map(|source| NormalizedSource {
                name: source.name,
                properties: source.entries,
            })
            .collect(),
        secret_keys,
        config_server_url: settings.redacted_base_url(),
        application: inputs.application.clone(),
        profile: inputs.profile.clone(),
        label: inputs.effective_label().map(str::to_string),
        version: response.version,
        state: response.state,
        profiles: response.profiles,
    })
}
