//! Index client abstraction and query option types.
//!
//! This module defines the transport seam between the query logic and
//! whatever actually talks to an index (HTTP, or an in-memory mock).

use crate::types::{QueryRequest, QueryResponse, SparseValues};
use pinecone_core::{PineconeError, PineconeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of matches requested when the caller does not say.
pub const DEFAULT_TOP_K: usize = 10;

/// Trait for index data-plane transports.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait::async_trait]
pub trait IndexClient: Send + Sync {
    /// Get the index host this client talks to.
    fn host(&self) -> &str;

    /// Query a single namespace.
    async fn query(&self, request: &QueryRequest) -> PineconeResult<QueryResponse>;
}

/// Query parameters shared by single- and multi-namespace queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Dense query vector (mutually exclusive with `id`)
    pub vector: Option<Vec<f32>>,

    /// Query by the stored vector with this id
    pub id: Option<String>,

    /// Sparse query vector for hybrid search
    pub sparse_vector: Option<SparseValues>,

    /// Number of matches to return, defaults to 10
    pub top_k: Option<usize>,

    /// Metadata filter expression
    pub filter: Option<Value>,

    /// Return stored vector values with each match
    pub include_values: Option<bool>,

    /// Return stored metadata with each match
    pub include_metadata: Option<bool>,
}

impl QueryOptions {
    /// Query by dense vector.
    pub fn with_vector(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            ..Self::default()
        }
    }

    /// Query by stored vector id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query by sparse vector only.
    pub fn with_sparse_vector(sparse_vector: SparseValues) -> Self {
        Self {
            sparse_vector: Some(sparse_vector),
            ..Self::default()
        }
    }

    /// Add a sparse vector to a dense query.
    pub fn sparse_vector(mut self, sparse_vector: SparseValues) -> Self {
        self.sparse_vector = Some(sparse_vector);
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn include_values(mut self, include: bool) -> Self {
        self.include_values = Some(include);
        self
    }

    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = Some(include);
        self
    }

    /// Requested `top_k`, or the default.
    pub fn effective_top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Check the argument combinations the service would reject.
    pub fn validate(&self) -> PineconeResult<()> {
        if self.vector.is_some() && self.id.is_some() {
            return Err(PineconeError::Validation(
                "Cannot specify both `id` and `vector`".to_string(),
            ));
        }

        if self.sparse_vector.is_none() {
            match (&self.vector, &self.id) {
                (Some(vector), _) if vector.is_empty() => {
                    return Err(PineconeError::Validation(
                        "Query vector must not be empty".to_string(),
                    ));
                }
                (None, None) => {
                    return Err(PineconeError::Validation(
                        "One of `vector`, `id` or `sparse_vector` must be specified".to_string(),
                    ));
                }
                _ => {}
            }
        }

        if let Some(sparse) = &self.sparse_vector {
            sparse.validate()?;
        }

        if self.effective_top_k() == 0 {
            return Err(PineconeError::InvalidTopK(0));
        }

        Ok(())
    }

    /// Build the wire request for one namespace.
    pub fn to_request(&self, namespace: &str) -> QueryRequest {
        QueryRequest {
            top_k: self.effective_top_k(),
            namespace: namespace.to_string(),
            vector: self.vector.clone(),
            id: self.id.clone(),
            sparse_vector: self.sparse_vector.clone(),
            filter: self.filter.clone(),
            include_values: self.include_values,
            include_metadata: self.include_metadata,
        }
    }
}
