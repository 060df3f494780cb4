// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use cfgresolve::ports::{ConfigTransport, FetchRequest, TransportFailure, TransportResponse};
use serde_json::json;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

/// One scripted transport outcome.
pub type Outcome = Result<TransportResponse, TransportFailure>;

/// A transport that replays a fixed list of outcomes and records requests.
///
/// Once the script runs out every further request fails to connect.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers 200 with `body`.
    pub fn always(body: &str) -> Self {
        Self::new(vec![ok(body); 16])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ConfigTransport for ScriptedTransport {
    fn execute(&self, request: &FetchRequest) -> impl Future<Output = Outcome> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::connection("connection refused")));
        async move { outcome }
    }
}

pub fn ok(body: &str) -> Outcome {
    Ok(TransportResponse::new(200, body))
}

pub fn status(code: u16) -> Outcome {
    Ok(TransportResponse::new(code, ""))
}

pub fn refused() -> Outcome {
    Err(TransportFailure::connection("connection refused"))
}

pub fn timeout() -> Outcome {
    Err(TransportFailure::Timeout)
}

/// `basic-app` / `development` with a profile fragment overriding the defaults.
pub fn basic_app_body() -> String {
    json!({
        "name": "basic-app",
        "profiles": ["development"],
        "label": null,
        "version": "4f2d9c1",
        "state": null,
        "propertySources": [
            {
                "name": "file:config/basic-app.yml",
                "source": {
                    "server.port": 8080,
                    "database.host": "localhost",
                    "database.port": 5432,
                    "feature.flags": ["search", "export"]
                }
            },
            {
                "name": "file:config/basic-app-development.yml",
                "source": {
                    "database.host": "dev-db.example.com",
                    "database.password": "dev-password",
                    "logging.level": "DEBUG"
                }
            }
        ]
    })
    .to_string()
}

/// Fragments from a file, a git repository and a vault backend.
pub fn mixed_backends_body() -> String {
    json!({
        "name": "secure-app",
        "profiles": ["production"],
        "label": "main",
        "version": null,
        "state": null,
        "propertySources": [
            {
                "name": "file:application.yml",
                "source": {"app.name": "secure-app", "server.port": 8443}
            },
            {
                "name": "git:main:secure-app-production.yml",
                "source": {"server.port": 9443, "cache.ttl": 300}
            },
            {
                "name": "vault:secret/secure-app",
                "source": {"database.host": "prod-db.internal", "api.key": "k-123"}
            }
        ]
    })
    .to_string()
}
