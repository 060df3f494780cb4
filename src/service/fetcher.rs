// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient configuration fetch client.
//!
//! [`ConfigFetcher`] turns one transport round trip into either a decoded
//! [`ConfigurationResponse`] or a classified, credential-redacted
//! [`ConfigError`], and retries transient failures with exponential backoff.

use crate::adapters::TracingSink;
use crate::domain::{
    client_error_hint, redact_credentials, ClientSettings, ConfigError, ConfigurationResponse,
    FetchContext, Result, RetryPolicy,
};
use crate::ports::{
    ConfigTransport, Diagnostic, DiagnosticSink, FetchRequest, TransportFailure, TransportResponse,
};
use std::sync::Arc;

/// Fetches configuration documents over a [`ConfigTransport`].
///
/// # Examples
///
/// ```rust
/// use cfgresolve::domain::{ClientSettings, RetryPolicy};
/// use cfgresolve::ports::{ConfigTransport, FetchRequest, TransportFailure, TransportResponse};
/// use cfgresolve::service::ConfigFetcher;
/// use std::future::Future;
///
/// struct Canned;
///
/// impl ConfigTransport for Canned {
///     fn execute(
///         &self,
///         _request: &FetchRequest,
///     ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send {
///         async { Ok(TransportResponse::new(200, r#"{"name": "orders", "propertySources": []}"#)) }
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let fetcher = ConfigFetcher::new(Canned, ClientSettings::new("http://config:8888").unwrap());
/// let response = fetcher
///     .fetch_with_retry("orders", "prod", None, &RetryPolicy::default())
///     .await
///     .unwrap();
/// assert_eq!(response.name, "orders");
/// # });
/// ```
pub struct ConfigFetcher<T> {
    transport: T,
    settings: ClientSettings,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<T: ConfigTransport> ConfigFetcher<T> {
    /// Creates a fetcher that reports diagnostics to `tracing`.
    pub fn new(transport: T, settings: ClientSettings) -> Self {
        Self {
            transport,
            settings,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The connection settings in use.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Performs a single attempt.
    ///
    /// # Errors
    ///
    /// - `ValidationError` when `application` or `profile` is blank
    /// - `NetworkError` / `TimeoutError` when no response arrived
    /// - `ServiceUnavailable`, `ClientError`, `ServerError` by HTTP status
    /// - `InvalidResponse` when a 2xx body is not a configuration document
    pub async fn fetch_once(
        &self,
        application: &str,
        profile: &str,
        label: Option<&str>,
    ) -> Result<ConfigurationResponse> {
        require_name("application", application)?;
        require_name("profile", profile)?;

        let url = self.settings.endpoint(application, profile, label);
        let context = FetchContext::new(application, profile, url.as_str());
        let request = FetchRequest {
            url,
            credentials: self.settings.credentials().cloned(),
            timeout: self.settings.timeout(),
        };

        tracing::debug!("Fetching configuration from {}", context.target);

        match self.transport.execute(&request).await {
            Ok(response) => interpret(response, context),
            Err(TransportFailure::Timeout) => Err(ConfigError::TimeoutError {
                context,
                timeout_ms: u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(TransportFailure::Connection { message }) => Err(ConfigError::NetworkError {
                context,
                message: redact_credentials(&message),
            }),
        }
    }

    /// Performs up to `policy.max_attempts` attempts.
    ///
    /// Network failures, timeouts and HTTP 503 are retried after
    /// `base_delay_ms * backoff_multiplier^n`; every other error is returned
    /// as soon as it occurs.
    ///
    /// # Errors
    ///
    /// `RetryExhausted` wrapping the last error when every attempt failed
    /// retryably, otherwise the first non-retryable error.
    pub async fn fetch_with_retry(
        &self,
        application: &str,
        profile: &str,
        label: Option<&str>,
        policy: &RetryPolicy,
    ) -> Result<ConfigurationResponse> {
        require_name("application", application)?;
        require_name("profile", profile)?;
        policy.validate()?;

        let max_attempts = policy.effective_attempts();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let error = match self.fetch_once(application, profile, label).await {
                Ok(response) => {
                    if attempt > 1 {
                        tracing::debug!("Configuration fetched on attempt {}", attempt);
                    }
                    return Ok(response);
                }
                Err(error) => error,
            };

            let retryable = error.is_retryable();
            self.diagnostics.report(Diagnostic::FetchAttemptFailed {
                attempt,
                max_attempts,
                retryable,
                message: error.to_string(),
            });

            if !retryable {
                return Err(error);
            }
            if attempt >= max_attempts {
                return Err(ConfigError::RetryExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            let delay = policy.delay_for(attempt - 1);
            self.diagnostics.report(Diagnostic::RetryScheduled {
                attempt: attempt + 1,
                delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            });
            tokio::time::sleep(delay).await;
        }
    }
}

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn interpret(response: TransportResponse, context: FetchContext) -> Result<ConfigurationResponse> {
    match response.status {
        200..=299 => ConfigurationResponse::from_json(&response.body).map_err(|e| {
            ConfigError::InvalidResponse {
                context,
                message: redact_credentials(&format!(
                    "body is not a configuration document: {}",
                    e
                )),
            }
        }),
        503 => Err(ConfigError::ServiceUnavailable { context }),
        status @ 400..=499 => {
            let hint = client_error_hint(status, &context.application, &context.profile);
            Err(ConfigError::ClientError {
                status,
                context,
                hint,
            })
        }
        status @ 500..=599 => Err(ConfigError::ServerError { status, context }),
        status => Err(ConfigError::InvalidResponse {
            context,
            message: format!("unexpected HTTP status {}", status),
        }),
    }
}
