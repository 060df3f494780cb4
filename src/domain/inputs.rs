// SPDX-License-Identifier: MIT OR Apache-2.0

//! The caller-supplied inputs of a resolution.
//!
//! Field names deserialize in camelCase so the same document can come from a
//! host orchestrator, a YAML settings file or environment variables.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::policy::{RetryPolicy, SecretPolicy};
use crate::domain::settings::{ClientSettings, Credentials, DEFAULT_TIMEOUT_MS};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

fn default_true() -> bool {
    true
}

/// Inputs for one resolution.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::ResolveInputs;
///
/// let inputs = ResolveInputs::new("http://config:8888", "orders", "prod")
///     .with_label("main")
///     .with_secret_sources(["vault"]);
/// assert!(inputs.validate().is_ok());
/// assert_eq!(inputs.effective_timeout_ms(), 10_000);
/// ```
#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveInputs {
    /// Base URL of the configuration server
    pub config_server_url: String,
    /// The application to resolve
    pub application: String,
    /// The profile to resolve (may be comma-separated)
    pub profile: String,
    /// Optional label (branch, tag, ...)
    #[serde(default)]
    pub label: Option<String>,
    /// Basic-auth user name
    #[serde(default)]
    pub username: Option<String>,
    /// Basic-auth password
    #[serde(default)]
    pub password: Option<String>,
    /// Per-attempt timeout; defaults to 10 000 ms
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Keep only fragments whose name contains one of these
    #[serde(default)]
    pub property_sources: Option<Vec<String>>,
    /// Fragment-name substrings that mark every key they supply as secret
    #[serde(default)]
    pub secret_sources: Option<Vec<String>>,
    /// Classify keys by name pattern
    #[serde(default = "default_true")]
    pub auto_detect_secrets: bool,
    /// Custom key-name pattern replacing the default one
    #[serde(default)]
    pub secret_key_pattern: Option<String>,
    /// Retry behaviour
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Per-key classification overrides
    #[serde(default)]
    pub secret_overrides: BTreeMap<String, bool>,
}

impl ResolveInputs {
    /// Creates inputs with every optional field at its default.
    pub fn new(
        config_server_url: impl Into<String>,
        application: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            config_server_url: config_server_url.into(),
            application: application.into(),
            profile: profile.into(),
            label: None,
            username: None,
            password: None,
            timeout_ms: None,
            property_sources: None,
            secret_sources: None,
            auto_detect_secrets: true,
            secret_key_pattern: None,
            retry: RetryPolicy::default(),
            secret_overrides: BTreeMap::new(),
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the per-attempt timeout in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Restricts the resolution to matching fragments.
    pub fn with_property_sources<I, S>(mut self, filter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_sources = Some(filter.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the secret-bearing fragment-name substrings.
    pub fn with_secret_sources<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_sources = Some(substrings.into_iter().map(Into::into).collect());
        self
    }

    /// Turns key-pattern classification on or off.
    pub fn with_auto_detect_secrets(mut self, enabled: bool) -> Self {
        self.auto_detect_secrets = enabled;
        self
    }

    /// Replaces the default key-name pattern.
    pub fn with_secret_key_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.secret_key_pattern = Some(pattern.into());
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Forces the classification of one key.
    pub fn with_secret_override(mut self, key: impl Into<String>, secret: bool) -> Self {
        self.secret_overrides.insert(key.into(), secret);
        self
    }

    /// The effective per-attempt timeout in milliseconds.
    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// The label, treating an empty string as absent.
    pub fn effective_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Checks every input that can be checked without a network call.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("configServerUrl", &self.config_server_url)?;
        require_non_blank("application", &self.application)?;
        require_non_blank("profile", &self.profile)?;
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::validation("timeoutMs", "must be greater than zero"));
        }
        self.retry.validate()?;
        self.client_settings()?;
        self.secret_policy()?;
        Ok(())
    }

    /// Builds the fetch client's connection settings.
    ///
    /// Explicit credentials are used only when both the user name and the
    /// password are present.
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let settings = ClientSettings::new(&self.config_server_url)?
            .with_timeout(Duration::from_millis(self.effective_timeout_ms()));
        Ok(match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                settings.with_credentials(Credentials::new(username, password))
            }
            _ => settings,
        })
    }

    /// Builds the classification policy.
    pub fn secret_policy(&self) -> Result<SecretPolicy> {
        let policy = SecretPolicy::default()
            .with_auto_detect(self.auto_detect_secrets)
            .with_secret_sources(self.secret_sources.iter().flatten().cloned());
        match (&self.secret_key_pattern, self.auto_detect_secrets) {
            (Some(pattern), true) => policy.with_key_pattern(pattern),
            _ => Ok(policy),
        }
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    Ok(())
}

impl fmt::Debug for ResolveInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveInputs")
            .field(
                "config_server_url",
                &crate::domain::redact::redact_credentials(&self.config_server_url),
            )
            .field("application", &self.application)
            .field("profile", &self.profile)
            .field("label", &self.label)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_ms", &self.timeout_ms)
            .field("property_sources", &self.property_sources)
            .field("secret_sources", &self.secret_sources)
            .field("auto_detect_secrets", &self.auto_detect_secrets)
            .field("secret_key_pattern", &self.secret_key_pattern)
            .field("retry", &self.retry)
            .field("secret_overrides", &self.secret_overrides)
            .finish()
    }
}
