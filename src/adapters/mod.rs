// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer (the reqwest transport, diagnostic sinks, settings readers)
//! and the thin lifecycle adapter hosts drive.

pub mod diagnostics;
#[cfg(feature = "env")]
pub mod env_settings;
#[cfg(feature = "http")]
pub mod http;
pub mod lifecycle;
pub mod settings_file;

// Re-export adapters based on feature flags
pub use diagnostics::{CollectingSink, NoopSink, TracingSink};
#[cfg(feature = "env")]
pub use env_settings::EnvInputsAdapter;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use lifecycle::{CreateResult, InputDiff, ResolvedConfigProvider};
pub use settings_file::{load_inputs_file, JsonInputsParser};
#[cfg(feature = "yaml")]
pub use settings_file::YamlInputsParser;
