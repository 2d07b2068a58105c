//! HTTP index client.
//!
//! Talks to the REST data-plane API of a single index host.

use crate::client::IndexClient;
use crate::types::{QueryRequest, QueryResponse};
use pinecone_core::config::DEFAULT_API_VERSION;
use pinecone_core::{PineconeError, PineconeResult};

/// REST client bound to one index host.
pub struct HttpIndexClient {
    /// Base URL of the index, including scheme
    host: String,

    api_key: String,

    api_version: String,

    /// HTTP client, shared connection pool
    client: reqwest::Client,
}

impl HttpIndexClient {
    /// Create a client for `host` using the default API version.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_api_version(host, api_key, DEFAULT_API_VERSION)
    }

    /// Create a client pinned to a specific API version.
    pub fn with_api_version(
        host: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let host: String = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client, e.g. one with custom proxy or TLS settings.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.host)
    }
}

impl std::fmt::Debug for HttpIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIndexClient")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl IndexClient for HttpIndexClient {
    fn host(&self) -> &str {
        &self.host
    }

    async fn query(&self, request: &QueryRequest) -> PineconeResult<QueryResponse> {
        tracing::debug!(namespace = %request.namespace, top_k = request.top_k, "Sending query");

        let response = self
            .client
            .post(self.query_url())
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-Api-Version", &self.api_version)
            .json(request)
            .send()
            .await
            .map_err(|e| PineconeError::Transport(format!("Failed to send query: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PineconeError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let query_response: QueryResponse = response.json().await.map_err(|e| {
            PineconeError::Serialization(format!("Failed to parse query response: {}", e))
        })?;

        Ok(query_response)
    }
}
