//! Error types for the Pinecone client.
//!
//! This module defines a unified error enum covering configuration,
//! validation, aggregation contract, and upstream (network) failures.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for the Pinecone client.
///
/// All fallible functions in the client return `Result<T, PineconeError>`.
/// Nothing is retried here; errors go straight back to the caller.
#[derive(Error, Debug)]
pub enum PineconeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// `top_k` below 1 when building an aggregator or a query
    #[error("Invalid top_k value {0}. top_k must be at least 1.")]
    InvalidTopK(i64),

    /// Metric name that results cannot be merged under
    #[error(
        "Cannot merge results for unknown similarity metric {0}. Supported metrics are 'dotproduct', 'cosine', and 'euclidean'."
    )]
    UnsupportedMetric(String),

    /// Results were added to an aggregator after they had been read
    #[error("Results have already been read. Cannot add more results.")]
    ResultsAlreadyRead,

    /// Request arguments rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single namespace request exceeded the per-call timeout
    #[error("Query against namespace '{namespace}' timed out after {timeout:?}")]
    Timeout { namespace: String, timeout: Duration },

    /// Non-success response from the service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection or request send failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PineconeError {
    fn from(err: serde_json::Error) -> Self {
        PineconeError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for PineconeError {
    fn from(err: serde_yaml::Error) -> Self {
        PineconeError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with PineconeError.
pub type PineconeResult<T> = Result<T, PineconeError>;
