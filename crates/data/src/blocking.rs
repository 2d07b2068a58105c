//! Blocking index handle.
//!
//! Wraps the async [`Index`](crate::Index) together with a dedicated
//! multi-thread runtime whose worker count matches `pool_threads`. The
//! runtime is created once and reused by every call.

use crate::client::{IndexClient, QueryOptions};
use crate::index::{Index as AsyncIndex, QueryNamespacesRequest};
use crate::results::QueryNamespacesResults;
use crate::types::QueryResponse;
use pinecone_core::{ClientConfig, PineconeResult};
use std::sync::Arc;
use std::time::Duration;

/// Synchronous handle to one index.
///
/// Must not be used from inside an async runtime; blocking calls there
/// panic in tokio.
pub struct Index {
    inner: AsyncIndex,
    runtime: tokio::runtime::Runtime,
}

impl Index {
    /// Wrap an existing client, running up to `pool_threads` requests at once.
    pub fn new(client: Arc<dyn IndexClient>, pool_threads: usize) -> PineconeResult<Self> {
        Self::from_async(AsyncIndex::new(client).with_pool_threads(pool_threads))
    }

    /// Build an HTTP-backed index from configuration.
    pub fn from_config(config: &ClientConfig) -> PineconeResult<Self> {
        Self::from_async(AsyncIndex::from_config(config)?)
    }

    fn from_async(inner: AsyncIndex) -> PineconeResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(inner.pool_threads())
            .thread_name("pinecone-query")
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }

    /// Apply `timeout` to every individual namespace request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    pub fn pool_threads(&self) -> usize {
        self.inner.pool_threads()
    }

    /// Query a single namespace.
    pub fn query(&self, namespace: &str, options: &QueryOptions) -> PineconeResult<QueryResponse> {
        self.runtime.block_on(self.inner.query(namespace, options))
    }

    /// Query several namespaces in parallel and merge the results.
    ///
    /// Same semantics as [`crate::Index::query_namespaces`].
    pub fn query_namespaces(
        &self,
        request: QueryNamespacesRequest,
    ) -> PineconeResult<QueryNamespacesResults> {
        self.runtime.block_on(self.inner.query_namespaces(request))
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Index")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
