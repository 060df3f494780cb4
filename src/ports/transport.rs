// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration transport trait definition.
//!
//! This module defines the `ConfigTransport` trait, which performs exactly
//! one HTTP GET against the configuration server. Status classification,
//! redaction and retries live above it, in the fetch service, so they behave
//! identically for every transport.

use crate::domain::redact::redact_credentials;
use crate::domain::Credentials;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// One GET request against the configuration server.
///
/// The `Debug` output masks userinfo in the address and the password.
#[derive(Clone)]
pub struct FetchRequest {
    /// The full endpoint address, possibly carrying userinfo
    pub url: Url,
    /// Explicit basic-auth credentials
    pub credentials: Option<Credentials>,
    /// Deadline for this attempt
    pub timeout: Duration,
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("url", &redact_credentials(self.url.as_str()))
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Whatever the server answered, any status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// The HTTP status code
    pub status: u16,
    /// The response body as text
    pub body: String,
}

impl TransportResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request produced no response at all.
///
/// Messages may echo the request address; callers redact before surfacing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportFailure {
    /// The attempt exceeded its deadline.
    #[error("request timed out")]
    Timeout,
    /// Connection refused, reset, unreachable host, DNS failure, ...
    #[error("{message}")]
    Connection {
        /// Transport-level description
        message: String,
    },
}

impl TransportFailure {
    /// Creates a connection failure.
    pub fn connection(message: impl Into<String>) -> Self {
        TransportFailure::Connection {
            message: message.into(),
        }
    }
}

/// A trait for performing a single configuration request.
///
/// Implementations must enforce `request.timeout` and report it as
/// [`TransportFailure::Timeout`]. Any HTTP status, success or not, is a
/// [`TransportResponse`].
///
/// # Examples
///
/// ```rust
/// use cfgresolve::ports::{ConfigTransport, FetchRequest, TransportFailure, TransportResponse};
/// use std::future::Future;
///
/// struct Down;
///
/// impl ConfigTransport for Down {
///     fn execute(
///         &self,
///         _request: &FetchRequest,
///     ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send {
///         async { Err(TransportFailure::connection("connection refused")) }
///     }
/// }
/// ```
pub trait ConfigTransport: Send + Sync {
    /// Sends `request` and waits for the response.
    fn execute(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send;
}

impl<T: ConfigTransport> ConfigTransport for Arc<T> {
    fn execute(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send {
        (**self).execute(request)
    }
}
