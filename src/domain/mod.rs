// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and policies.
//!
//! This module contains the values a resolution works with: the server
//! response, raw and normalized property values, the retry and secret
//! policies, the caller's inputs and the persisted state. It is independent
//! of any transport or host.

pub mod errors;
pub mod inputs;
pub mod normalized_value;
pub mod policy;
pub mod property_source;
pub mod raw_value;
pub mod redact;
pub mod service;
pub mod settings;
pub mod state;

// Re-export commonly used types
pub use errors::{client_error_hint, ConfigError, ErrorKind, FetchContext, Result};
pub use inputs::ResolveInputs;
pub use normalized_value::NormalizedValue;
pub use policy::{RetryPolicy, SecretPolicy, DEFAULT_SECRET_KEY_PATTERN};
pub use property_source::{ConfigurationResponse, PropertySource};
pub use raw_value::RawValue;
pub use redact::redact_credentials;
pub use service::ConfigurationResolver;
pub use settings::{ClientSettings, Credentials, DEFAULT_TIMEOUT_MS};
pub use state::{NormalizedSource, PersistableState, MASKED_VALUE};
