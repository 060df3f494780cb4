// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings parser trait definition.
//!
//! This module defines the `InputsParser` trait, which provides an interface for
//! reading [`ResolveInputs`] from settings documents in different formats
//! (YAML, JSON, etc.).

use crate::domain::{ResolveInputs, Result};

/// A trait for parsing resolution settings documents.
///
/// Documents use the camelCase field names of [`ResolveInputs`]:
///
/// ```yaml
/// configServerUrl: http://config:8888
/// application: orders
/// profile: prod
/// retry:
///   maxAttempts: 5
/// ```
///
/// # Examples
///
/// ```rust
/// use cfgresolve::ports::InputsParser;
/// use cfgresolve::domain::{ResolveInputs, Result};
///
/// struct Fixed;
///
/// impl InputsParser for Fixed {
///     fn parse(&self, _content: &str) -> Result<ResolveInputs> {
///         Ok(ResolveInputs::new("http://config:8888", "orders", "prod"))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["fixed"]
///     }
/// }
///
/// let inputs = Fixed.parse("").unwrap();
/// assert_eq!(inputs.application, "orders");
/// ```
pub trait InputsParser {
    /// Parses a settings document.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` when the document is malformed or lacks a
    /// required field.
    fn parse(&self, content: &str) -> Result<ResolveInputs>;

    /// Returns the file extensions supported by this parser.
    ///
    /// This allows the loader to select the appropriate parser based on the
    /// file extension.
    fn supported_extensions(&self) -> &[&str];

    /// Whether this parser handles files with the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }
}
