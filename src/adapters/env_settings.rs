// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable settings adapter.
//!
//! This module provides an adapter that reads [`ResolveInputs`] from
//! environment variables sharing a common prefix.

use crate::domain::{ConfigError, NormalizedValue, ResolveInputs, Result, RetryPolicy};
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Reads resolution settings from prefixed environment variables.
///
/// With prefix `CFG_` the recognised variables are:
///
/// | Variable | Field |
/// |---|---|
/// | `CFG_URL` | `config_server_url` (required) |
/// | `CFG_APPLICATION` | `application` (required) |
/// | `CFG_PROFILE` | `profile` (required) |
/// | `CFG_LABEL` | `label` |
/// | `CFG_USERNAME`, `CFG_PASSWORD` | basic-auth credentials |
/// | `CFG_TIMEOUT_MS` | `timeout_ms` |
/// | `CFG_PROPERTY_SOURCES` | fragment filter, comma-separated |
/// | `CFG_SECRET_SOURCES` | secret fragment substrings, comma-separated |
/// | `CFG_AUTO_DETECT_SECRETS` | `auto_detect_secrets` |
/// | `CFG_SECRET_KEY_PATTERN` | `secret_key_pattern` |
/// | `CFG_MAX_ATTEMPTS`, `CFG_BASE_DELAY_MS`, `CFG_BACKOFF_MULTIPLIER` | `retry` |
///
/// # Examples
///
/// ```rust
/// use cfgresolve::adapters::EnvInputsAdapter;
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("URL".to_string(), "http://config:8888".to_string());
/// values.insert("APPLICATION".to_string(), "orders".to_string());
/// values.insert("PROFILE".to_string(), "prod".to_string());
/// values.insert("SECRET_SOURCES".to_string(), "vault, aws".to_string());
///
/// let inputs = EnvInputsAdapter::with_values(values).load().unwrap();
/// assert_eq!(inputs.secret_sources, Some(vec!["vault".to_string(), "aws".to_string()]));
/// ```
#[derive(Debug, Clone)]
pub struct EnvInputsAdapter {
    prefix: String,
    values: Option<HashMap<String, String>>,
}

impl EnvInputsAdapter {
    /// Creates an adapter reading the process environment.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: None,
        }
    }

    /// Creates an adapter with pre-populated values for testing.
    ///
    /// Keys are variable names without the prefix.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: String::new(),
            values: Some(values),
        }
    }

    /// Reads and parses the settings.
    ///
    /// # Errors
    ///
    /// `ValidationError` when a required variable is missing,
    /// `TypeConversionError` when a numeric or boolean variable does not parse.
    pub fn load(&self) -> Result<ResolveInputs> {
        let vars = self.vars();
        let required = |name: &str| -> Result<String> {
            vars.get(name)
                .filter(|value| !value.trim().is_empty())
                .cloned()
                .ok_or_else(|| {
                    ConfigError::validation(&self.var_name(name), "environment variable not set")
                })
        };

        let mut inputs = ResolveInputs::new(
            required("URL")?,
            required("APPLICATION")?,
            required("PROFILE")?,
        );
        inputs.label = vars.get("LABEL").cloned();
        inputs.username = vars.get("USERNAME").cloned();
        inputs.password = vars.get("PASSWORD").cloned();
        inputs.secret_key_pattern = vars.get("SECRET_KEY_PATTERN").cloned();
        inputs.property_sources = vars.get("PROPERTY_SOURCES").map(|v| split_list(v));
        inputs.secret_sources = vars.get("SECRET_SOURCES").map(|v| split_list(v));

        if let Some(raw) = vars.get("TIMEOUT_MS") {
            inputs.timeout_ms = Some(self.typed(raw, "TIMEOUT_MS")?);
        }
        if let Some(raw) = vars.get("AUTO_DETECT_SECRETS") {
            inputs.auto_detect_secrets =
                NormalizedValue::from(raw.as_str()).as_bool(&self.var_name("AUTO_DETECT_SECRETS"))?;
        }

        let defaults = RetryPolicy::default();
        inputs.retry = RetryPolicy::new(
            self.typed_or(&vars, "MAX_ATTEMPTS", defaults.max_attempts)?,
            self.typed_or(&vars, "BASE_DELAY_MS", defaults.base_delay_ms)?,
            self.typed_or(&vars, "BACKOFF_MULTIPLIER", defaults.backoff_multiplier)?,
        );

        tracing::debug!(
            "Loaded resolution settings from environment (prefix={:?}, {} variable(s))",
            self.prefix,
            vars.len()
        );
        Ok(inputs)
    }

    fn var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn typed<T>(&self, raw: &str, name: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        NormalizedValue::from(raw.trim()).parse(&self.var_name(name))
    }

    fn typed_or<T>(&self, vars: &HashMap<String, String>, name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match vars.get(name) {
            Some(raw) => self.typed(raw, name),
            None => Ok(default),
        }
    }

    /// Prefix-stripped variables, oversized entries skipped.
    fn vars(&self) -> HashMap<String, String> {
        if let Some(values) = &self.values {
            return values.clone();
        }

        let mut vars = HashMap::new();
        for (key, value) in env::vars() {
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={}",
                    key.len(),
                    value.len()
                );
                continue;
            }
            if let Some(stripped) = key.strip_prefix(&self.prefix) {
                vars.insert(stripped.to_string(), value);
            }
        }
        vars
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl ResolveInputs {
    /// Reads inputs from environment variables starting with `prefix`.
    ///
    /// See [`EnvInputsAdapter`] for the variable names.
    pub fn from_env(prefix: &str) -> Result<Self> {
        EnvInputsAdapter::new(prefix).load()
    }

    /// Reads inputs from an in-memory variable map (names without prefix).
    pub fn from_env_values(values: HashMap<String, String>) -> Result<Self> {
        EnvInputsAdapter::with_values(values).load()
    }
}
