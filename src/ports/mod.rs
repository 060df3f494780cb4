// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that connect the
//! resolution core to the outside world: the transport that talks to the
//! configuration server, the sink that receives diagnostics, and the parsers
//! that read settings documents. Adapters implement them.

pub mod diagnostics;
pub mod parser;
pub mod transport;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use parser::InputsParser;
pub use transport::{ConfigTransport, FetchRequest, TransportFailure, TransportResponse};
