// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal configuration resolution crate.
//!
//! This crate fetches application configuration from a Spring-Cloud-Config
//! style server and turns it into a flat, provenance-tracked property map in
//! which every value is storage-safe and sensitive keys are flagged.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and policies (`RawValue`, `NormalizedValue`,
//!   `RetryPolicy`, `SecretPolicy`, `ResolveInputs`, `PersistableState`, errors)
//! - **Ports**: Trait definitions that define interfaces (`ConfigTransport`,
//!   `DiagnosticSink`, `InputsParser`)
//! - **Adapters**: Implementations for specific backends (reqwest, tracing,
//!   YAML/JSON/env settings) and the host lifecycle adapter
//! - **Service**: The resolution engine (fetcher, aggregator, classifier,
//!   normalizer) and the `Resolver` that runs it
//!
//! # Features
//!
//! - **Resilient fetching**: Retries network failures, timeouts and HTTP 503
//!   with exponential backoff; credentials never appear in errors
//! - **Provenance**: Every merged key lists each fragment that supplied it
//! - **Secret classification**: By key-name pattern, by fragment name, or by
//!   explicit override
//! - **Normalization**: Every value becomes a string, finite number, boolean
//!   or null
//!
//! # Feature Flags
//!
//! - `http`: Enable the reqwest transport (default)
//! - `yaml`: Enable YAML settings files (default)
//! - `env`: Enable environment variable settings (default)
//! - `cli`: Enable the command-line demo
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cfgresolve::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let resolver = Resolver::http()?;
//! let inputs = ResolveInputs::new("http://config:8888", "orders", "prod")
//!     .with_secret_sources(["vault"]);
//! let state = resolver.resolve(&inputs).await?;
//! for (key, value) in &state.properties {
//!     if !state.is_secret(key) {
//!         println!("{} = {}", key, value);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigurationResolver, ConfigurationResponse, NormalizedValue,
        PersistableState, PropertySource, RawValue, ResolveInputs, Result, RetryPolicy,
        SecretPolicy,
    };
    pub use crate::ports::{ConfigTransport, Diagnostic, DiagnosticSink};
    pub use crate::service::{ConfigFetcher, Resolver};

    pub use crate::adapters::{CollectingSink, ResolvedConfigProvider, TracingSink};
    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvInputsAdapter;
    #[cfg(feature = "http")]
    pub use crate::adapters::HttpTransport;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlInputsParser;
}
