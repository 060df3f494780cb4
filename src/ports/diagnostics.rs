// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic sink trait definition.
//!
//! Resolution reports noteworthy events (failed attempts, scheduled retries,
//! filters that excluded everything) to an injected `DiagnosticSink` instead
//! of a global logger. Every message handed to a sink is already
//! credential-redacted, and secret values never appear in events.

use std::fmt;
use std::sync::Arc;

/// A noteworthy event during one resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A fetch attempt failed.
    FetchAttemptFailed {
        /// 1-based attempt number
        attempt: u32,
        /// Attempts permitted by the policy
        max_attempts: u32,
        /// Whether the failure is retryable
        retryable: bool,
        /// Redacted error message
        message: String,
    },
    /// The fetcher is about to sleep before the next attempt.
    RetryScheduled {
        /// 1-based number of the attempt that will follow
        attempt: u32,
        /// Backoff delay in milliseconds
        delay_ms: u64,
    },
    /// The fragment filter excluded every fragment.
    AllSourcesFiltered {
        /// The filter substrings
        filter: Vec<String>,
        /// Names of the fragments the server returned
        available: Vec<String>,
    },
    /// A resolution completed.
    Resolved {
        /// The resolved application
        application: String,
        /// The resolved profile
        profile: String,
        /// Number of retained fragments
        sources: usize,
        /// Number of merged properties
        properties: usize,
        /// Number of properties classified as sensitive
        secrets: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FetchAttemptFailed {
                attempt,
                max_attempts,
                retryable,
                message,
            } => write!(
                f,
                "attempt {}/{} failed ({}): {}",
                attempt,
                max_attempts,
                if *retryable { "retryable" } else { "fatal" },
                message
            ),
            Diagnostic::RetryScheduled { attempt, delay_ms } => {
                write!(f, "retrying in {}ms (attempt {})", delay_ms, attempt)
            }
            Diagnostic::AllSourcesFiltered { filter, available } => write!(
                f,
                "property source filter [{}] matched none of [{}]",
                filter.join(", "),
                available.join(", ")
            ),
            Diagnostic::Resolved {
                application,
                profile,
                sources,
                properties,
                secrets,
            } => write!(
                f,
                "resolved {}/{}: {} source(s), {} propert(ies), {} secret(s)",
                application, profile, sources, properties, secrets
            ),
        }
    }
}

/// A trait for receiving resolution diagnostics.
///
/// # Thread Safety
///
/// Sinks are shared between concurrent resolutions and must be `Send + Sync`.
///
/// # Examples
///
/// ```rust
/// use cfgresolve::ports::{Diagnostic, DiagnosticSink};
///
/// struct Stderr;
///
/// impl DiagnosticSink for Stderr {
///     fn report(&self, event: Diagnostic) {
///         eprintln!("{}", event);
///     }
/// }
/// ```
pub trait DiagnosticSink: Send + Sync {
    /// Receives one event.
    fn report(&self, event: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn report(&self, event: Diagnostic) {
        (**self).report(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let event = Diagnostic::FetchAttemptFailed {
            attempt: 2,
            max_attempts: 3,
            retryable: true,
            message: "HTTP 503".to_string(),
        };
        assert_eq!(event.to_string(), "attempt 2/3 failed (retryable): HTTP 503");

        let event = Diagnostic::AllSourcesFiltered {
            filter: vec!["vault".to_string()],
            available: vec!["git:a".to_string(), "file:b".to_string()],
        };
        assert_eq!(
            event.to_string(),
            "property source filter [vault] matched none of [git:a, file:b]"
        );
    }
}
