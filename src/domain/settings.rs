// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection settings for the configuration server.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::redact::redact_credentials;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default per-attempt timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Basic-auth credentials.
///
/// The `Debug` output never shows the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The user name
    pub username: String,
    /// The password
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything the fetch client needs to reach the server.
///
/// # Examples
///
/// ```
/// use cfgresolve::domain::ClientSettings;
/// use std::time::Duration;
///
/// let settings = ClientSettings::new("http://config:8888").unwrap()
///     .with_timeout(Duration::from_secs(2));
/// assert_eq!(settings.redacted_base_url(), "http://config:8888/");
/// ```
#[derive(Clone)]
pub struct ClientSettings {
    base_url: Url,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.redacted_base_url())
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientSettings {
    /// Parses the base URL. Only `http` and `https` are accepted.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::validation(
                "configServerUrl",
                "must not be empty",
            ));
        }
        let parsed = Url::parse(trimmed).map_err(|e| {
            ConfigError::validation(
                "configServerUrl",
                format!("'{}' is not a valid URL: {}", redact_credentials(trimmed), e),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ConfigError::validation(
                "configServerUrl",
                format!(
                    "'{}' must be an http or https URL",
                    redact_credentials(trimmed)
                ),
            ));
        }
        Ok(Self {
            base_url: parsed,
            credentials: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        })
    }

    /// Sets explicit basic-auth credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The parsed base URL, including any embedded userinfo.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The explicit credentials, if both halves were supplied.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// The per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The base URL with embedded credentials masked.
    pub fn redacted_base_url(&self) -> String {
        redact_credentials(self.base_url.as_str())
    }

    /// Builds `{base}/{application}/{profile}[/{label}]`.
    ///
    /// A `/` inside the label is sent as `(_)`, the server's escape for
    /// branch names such as `feature/x`. When explicit credentials are set,
    /// userinfo embedded in the base URL is dropped so only one
    /// `Authorization` header is produced.
    pub fn endpoint(&self, application: &str, profile: &str, label: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if self.credentials.is_some() {
            // Both setters only fail for cannot-be-a-base URLs, rejected in `new`
            let _ = url.set_username("");
            let _ = url.set_password(None);
        }
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.push(application);
            segments.push(profile);
            if let Some(label) = label.filter(|l| !l.is_empty()) {
                segments.push(&label.replace('/', "(_)"));
            }
        }
        url
    }
}
