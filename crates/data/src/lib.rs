//! Data-plane client for Pinecone indexes.
//!
//! This crate queries a single index, either one namespace at a time or
//! across many namespaces at once. A multi-namespace query is fanned out
//! concurrently and the per-namespace pages are merged into one ranked
//! top-k by [`QueryResultsAggregator`].
//!
//! # Clients
//! - [`HttpIndexClient`]: REST data-plane API
//! - [`MockIndexClient`]: canned in-memory responses
//!
//! # Example
//! ```no_run
//! use pinecone_core::ClientConfig;
//! use pinecone_data::{Index, Metric, QueryNamespacesRequest, QueryOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = Index::from_config(&ClientConfig::load()?)?;
//! let request = QueryNamespacesRequest::new(
//!     ["ns1", "ns2", "ns3"],
//!     Metric::Cosine,
//!     QueryOptions::with_vector(vec![0.1, 0.2, 0.3]).top_k(10),
//! );
//! let results = index.query_namespaces(request).await?;
//! for m in &results.matches {
//!     println!("{} {} {}", m.namespace, m.id, m.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod blocking;
pub mod client;
pub mod factory;
pub mod index;
pub mod providers;
pub mod results;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types
pub use aggregator::QueryResultsAggregator;
pub use client::{IndexClient, QueryOptions, DEFAULT_TOP_K};
pub use factory::create_client;
pub use index::{Index, QueryNamespacesRequest};
pub use providers::{HttpIndexClient, MockIndexClient};
pub use results::{NamespacedMatch, QueryNamespacesResults};
pub use types::{Metadata, Metric, QueryRequest, QueryResponse, ScoredVector, SparseValues, Usage};
