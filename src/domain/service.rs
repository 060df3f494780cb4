// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration resolver trait definition.
//!
//! This module defines the `ConfigurationResolver` trait, the main interface
//! of the crate: it turns [`ResolveInputs`] into a [`PersistableState`].

use crate::domain::{PersistableState, ResolveInputs, Result};
use std::future::Future;

/// The main configuration resolution trait.
///
/// An implementation fetches the configuration document, filters and merges
/// its fragments, classifies and normalizes the result. Each call rebuilds
/// everything from scratch; implementations hold no state between calls.
///
/// # Examples
///
/// ```rust
/// use cfgresolve::domain::{ConfigurationResolver, PersistableState, ResolveInputs, Result};
/// use std::future::Future;
///
/// struct Unreachable;
///
/// impl ConfigurationResolver for Unreachable {
///     fn resolve(&self, inputs: &ResolveInputs) -> impl Future<Output = Result<PersistableState>> + Send {
///         let outcome = inputs.validate().and_then(|_| {
///             Err(cfgresolve::domain::ConfigError::validation("configServerUrl", "unreachable"))
///         });
///         async move { outcome }
///     }
/// }
/// ```
pub trait ConfigurationResolver: Send + Sync {
    /// Resolves the configuration described by `inputs`.
    ///
    /// # Errors
    ///
    /// Fails with a validation error before any network call when the inputs
    /// are incomplete, or with the fetch error when the server cannot supply
    /// a configuration document. There are no partial results.
    fn resolve(
        &self,
        inputs: &ResolveInputs,
    ) -> impl Future<Output = Result<PersistableState>> + Send;
}
