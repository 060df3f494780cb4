// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport adapter.
//!
//! This module provides the production [`ConfigTransport`], a thin wrapper
//! over an async `reqwest` client using the rustls TLS stack.

use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigTransport, FetchRequest, TransportFailure, TransportResponse};
use reqwest::header::ACCEPT;
use std::error::Error as _;
use std::future::Future;

const USER_AGENT: &str = concat!("cfgresolve/", env!("CARGO_PKG_VERSION"));

/// Sends configuration requests with `reqwest`.
///
/// The client is cheap to clone and shares its connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use cfgresolve::adapters::HttpTransport;
/// use cfgresolve::service::Resolver;
///
/// let resolver = Resolver::new(HttpTransport::new().unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a client with the rustls TLS stack.
    pub fn new() -> Result<Self> {
        Self::from_builder(reqwest::Client::builder().use_rustls_tls())
    }

    /// Builds a client from a custom reqwest builder.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::validation("httpClient", describe(&e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ConfigTransport for HttpTransport {
    fn execute(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = std::result::Result<TransportResponse, TransportFailure>> + Send {
        let mut builder = self
            .client
            .get(request.url.clone())
            .header(ACCEPT, "application/json")
            .timeout(request.timeout);
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        async move {
            let response = builder.send().await.map_err(failure)?;
            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                // The status alone decides a failed request
                Err(_) if !status.is_success() => String::new(),
                Err(e) => return Err(failure(e)),
            };
            Ok(TransportResponse {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn failure(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::connection(describe(&error))
    }
}

/// The error and its sources, joined with `: `.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
