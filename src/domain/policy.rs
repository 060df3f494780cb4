// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry and secret-classification policies.
//!
//! Both policies are immutable values with named fields and documented
//! defaults. They are built once per resolution from the caller's inputs.

use crate::domain::errors::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of fetch attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default delay before the first retry, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default growth factor applied to the delay after each failed attempt.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Key names that look sensitive.
///
/// Matches keys containing `password`, `secret`, `token`, `credential` or
/// `auth`, keys ending in `key`, and keys containing `api_key`, `api-key` or
/// `apikey`. Always applied case-insensitively.
pub const DEFAULT_SECRET_KEY_PATTERN: &str =
    r"password|secret|token|credential|auth|key$|api[_-]?key";

static DEFAULT_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(DEFAULT_SECRET_KEY_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("default secret key pattern is valid")
});

/// Governs how often and how patiently a fetch is retried.
///
/// The delay before retry `n` (counting the first attempt as index 0) is
/// `base_delay_ms * backoff_multiplier^n`.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, 10, 2.0);
/// assert_eq!(policy.delay_for(0), Duration::from_millis(10));
/// assert_eq!(policy.delay_for(1), Duration::from_millis(20));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one; `0` behaves like `1`
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay_ms: u64,
    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Creates a policy from its three parameters.
    pub fn new(max_attempts: u32, base_delay_ms: u64, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            backoff_multiplier,
        }
    }

    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self::new(1, 0, 1.0)
    }

    /// The number of attempts actually performed.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// The delay awaited after the failed attempt with the given 0-based index.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);
        let millis = self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        if !millis.is_finite() {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(millis.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
    }

    /// Rejects multipliers that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 0.0 {
            return Err(ConfigError::validation(
                "retry.backoffMultiplier",
                format!(
                    "must be a finite, non-negative number (got {})",
                    self.backoff_multiplier
                ),
            ));
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_BASE_DELAY_MS,
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }
}

/// Decides which resolved properties are sensitive.
///
/// Two independent signals feed the decision: a key-name pattern and a list
/// of fragment-name substrings identifying secret-bearing sources. Either
/// signal can be switched off; with both off nothing is classified secret.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::SecretPolicy;
///
/// let policy = SecretPolicy::default().with_secret_sources(["vault"]);
/// assert!(policy.key_pattern().is_some());
/// assert_eq!(policy.secret_sources(), ["vault".to_string()]);
/// ```
#[derive(Clone, Debug)]
pub struct SecretPolicy {
    key_pattern: Option<Regex>,
    secret_sources: Vec<String>,
}

impl SecretPolicy {
    /// A policy with both signals disabled.
    pub fn disabled() -> Self {
        Self {
            key_pattern: None,
            secret_sources: Vec::new(),
        }
    }

    /// Replaces the key pattern with a custom expression.
    ///
    /// The expression is compiled case-insensitively. An invalid expression is
    /// reported as a validation error.
    pub fn with_key_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::validation("secretKeyPattern", e.to_string()))?;
        self.key_pattern = Some(regex);
        Ok(self)
    }

    /// Turns key-pattern detection on (default pattern) or off.
    pub fn with_auto_detect(mut self, enabled: bool) -> Self {
        self.key_pattern = enabled.then(|| DEFAULT_KEY_REGEX.clone());
        self
    }

    /// Sets the fragment-name substrings that mark a source as secret-bearing.
    ///
    /// Empty substrings are ignored.
    pub fn with_secret_sources<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_sources = substrings
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        self
    }

    /// The active key pattern, if pattern detection is enabled.
    pub fn key_pattern(&self) -> Option<&Regex> {
        self.key_pattern.as_ref()
    }

    /// The configured secret-bearing fragment-name substrings.
    pub fn secret_sources(&self) -> &[String] {
        &self.secret_sources
    }

    /// Returns `true` when neither signal can classify anything.
    pub fn is_disabled(&self) -> bool {
        self.key_pattern.is_none() && self.secret_sources.is_empty()
    }
}

impl Default for SecretPolicy {
    /// Default key pattern, no secret sources.
    fn default() -> Self {
        Self {
            key_pattern: Some(DEFAULT_KEY_REGEX.clone()),
            secret_sources: Vec::new(),
        }
    }
}
