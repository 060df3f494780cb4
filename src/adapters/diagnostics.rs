// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic sink adapters.
//!
//! [`TracingSink`] forwards events to `tracing` and is what resolvers use
//! unless told otherwise. [`CollectingSink`] keeps events in memory for hosts
//! that surface them elsewhere, and for tests. [`NoopSink`] drops them.

use crate::ports::{Diagnostic, DiagnosticSink};
use std::sync::Mutex;

/// Forwards diagnostics to the `tracing` macros.
///
/// Failed attempts are logged at `warn`, retries at `debug` and completed
/// resolutions at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, event: Diagnostic) {
        match &event {
            Diagnostic::FetchAttemptFailed {
                attempt,
                max_attempts,
                retryable,
                message,
            } => tracing::warn!(
                attempt = *attempt,
                max_attempts = *max_attempts,
                retryable = *retryable,
                "Configuration fetch attempt failed: {}",
                message
            ),
            Diagnostic::RetryScheduled { attempt, delay_ms } => tracing::debug!(
                attempt = *attempt,
                delay_ms = *delay_ms,
                "Retrying configuration fetch"
            ),
            Diagnostic::AllSourcesFiltered { .. } => tracing::warn!("{}", event),
            Diagnostic::Resolved { .. } => tracing::info!("{}", event),
        }
    }
}

/// Records every event in memory.
///
/// # Examples
///
/// ```rust
/// use cfgresolve::adapters::CollectingSink;
/// use cfgresolve::ports::{Diagnostic, DiagnosticSink};
///
/// let sink = CollectingSink::new();
/// sink.report(Diagnostic::RetryScheduled { attempt: 2, delay_ms: 10 });
/// assert_eq!(sink.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, event: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _event: Diagnostic) {}
}
