// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the resolution engine.
//!
//! Each submodule is one stage: [`fetcher`] talks to the server,
//! [`aggregator`] merges fragments, [`classifier`] flags secrets,
//! [`normalizer`] makes values storage-safe, and [`resolver`] runs them in
//! order.

pub mod aggregator;
pub mod classifier;
pub mod fetcher;
pub mod normalizer;
pub mod resolver;

// Re-export commonly used types
pub use aggregator::{aggregate, Aggregation, FlatProperties, ProvenanceIndex};
pub use classifier::{classify, classify_with_override, collect_secrets};
pub use fetcher::ConfigFetcher;
pub use normalizer::normalize;
pub use resolver::Resolver;
