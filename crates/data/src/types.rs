//! Data-plane request and response types.
//!
//! These mirror the JSON shapes of the index `query` endpoint. Field names
//! follow the REST API (camelCase) on the wire; the gRPC-style snake_case
//! spellings are accepted as aliases when decoding.

use pinecone_core::{PineconeError, PineconeResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Free-form metadata attached to a vector.
pub type Metadata = Map<String, Value>;

/// Sparse vector representation: parallel index and value lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseValues {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseValues {
    /// Create a sparse vector, rejecting mismatched lengths.
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> PineconeResult<Self> {
        let sparse = Self { indices, values };
        sparse.validate()?;
        Ok(sparse)
    }

    pub fn validate(&self) -> PineconeResult<()> {
        if self.indices.len() != self.values.len() {
            return Err(PineconeError::Validation(
                "Sparse values indices and values must have the same length".to_string(),
            ));
        }
        Ok(())
    }
}

/// One scored match returned by a single-namespace query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVector {
    pub id: String,

    pub score: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,

    #[serde(
        default,
        alias = "sparseValues",
        skip_serializing_if = "Option::is_none"
    )]
    pub sparse_values: Option<SparseValues>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ScoredVector {
    /// Create a bare match carrying only an id and a score.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            values: None,
            sparse_values: None,
            metadata: None,
        }
    }
}

/// Read-unit accounting reported by the service.
///
/// The REST API spells the field `readUnits`, the gRPC API `read_units`;
/// both decode into the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, alias = "readUnits")]
    pub read_units: u64,
}

impl Usage {
    pub fn new(read_units: u64) -> Self {
        Self { read_units }
    }
}

/// Response of a single-namespace query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<ScoredVector>,

    #[serde(default)]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl QueryResponse {
    /// Read units consumed by this response, zero when the service sent none.
    pub fn read_units(&self) -> u64 {
        self.usage.map(|u| u.read_units).unwrap_or(0)
    }
}

/// Pretty JSON with long vectors shortened to a preview.
impl fmt::Display for QueryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::results::write_preview(f, self)
    }
}

/// Request body of the `query` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub top_k: usize,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseValues>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_values: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
}

/// Similarity metric of an index.
///
/// The client never computes similarity; the metric only decides which
/// direction of score is better when merging results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
    Dotproduct,
}

impl Metric {
    /// Get the canonical metric name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::Dotproduct => "dotproduct",
        }
    }

    /// Whether a larger score means a closer match.
    pub fn higher_is_better(&self) -> bool {
        match self {
            Self::Cosine | Self::Dotproduct => true,
            Self::Euclidean => false,
        }
    }
}

impl FromStr for Metric {
    type Err = PineconeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            "dotproduct" => Ok(Self::Dotproduct),
            other => Err(PineconeError::UnsupportedMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
