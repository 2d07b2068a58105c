//! Index handle: single-namespace queries and the multi-namespace fan-out.

use crate::aggregator::QueryResultsAggregator;
use crate::client::{IndexClient, QueryOptions};
use crate::factory::create_client;
use crate::results::QueryNamespacesResults;
use crate::types::{Metric, QueryRequest, QueryResponse};
use futures::StreamExt;
use pinecone_core::config::default_pool_threads;
use pinecone_core::{ClientConfig, PineconeError, PineconeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// A query to run against several namespaces and merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryNamespacesRequest {
    /// Target namespaces; duplicates are queried once
    pub namespaces: Vec<String>,

    /// Metric of the index, used to decide which scores are better
    pub metric: Metric,

    /// Parameters applied identically to every namespace
    pub options: QueryOptions,
}

impl QueryNamespacesRequest {
    pub fn new<I, S>(namespaces: I, metric: Metric, options: QueryOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            metric,
            options,
        }
    }
}

/// Async handle to one index.
///
/// Cheap to clone; clones share the underlying client and its connection
/// pool.
#[derive(Clone)]
pub struct Index {
    client: Arc<dyn IndexClient>,
    pool_threads: usize,
    timeout: Option<Duration>,
}

impl Index {
    /// Wrap an existing client with default concurrency and no timeout.
    pub fn new(client: Arc<dyn IndexClient>) -> Self {
        Self {
            client,
            pool_threads: default_pool_threads(),
            timeout: None,
        }
    }

    /// Build an HTTP-backed index from configuration.
    pub fn from_config(config: &ClientConfig) -> PineconeResult<Self> {
        let client = create_client(config)?;
        let mut index = Self::new(client).with_pool_threads(config.pool_threads);
        if let Some(timeout) = config.timeout() {
            index = index.with_timeout(timeout);
        }
        Ok(index)
    }

    /// Limit the number of namespace requests in flight at once.
    pub fn with_pool_threads(mut self, pool_threads: usize) -> Self {
        self.pool_threads = pool_threads.max(1);
        self
    }

    /// Apply `timeout` to every individual namespace request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn pool_threads(&self) -> usize {
        self.pool_threads
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    /// Query a single namespace.
    pub async fn query(
        &self,
        namespace: &str,
        options: &QueryOptions,
    ) -> PineconeResult<QueryResponse> {
        options.validate()?;
        self.send(options.to_request(namespace)).await
    }

    /// Query several namespaces concurrently and merge the results.
    ///
    /// All validation happens before any request is sent. Responses are
    /// merged in completion order; the first failing namespace fails the
    /// whole call and the requests still in flight are dropped.
    ///
    /// # Errors
    /// - [`PineconeError::Validation`] for an empty namespace list or bad
    ///   query arguments
    /// - [`PineconeError::InvalidTopK`] for `top_k == 0`
    /// - whatever the first failing namespace request returned
    pub async fn query_namespaces(
        &self,
        request: QueryNamespacesRequest,
    ) -> PineconeResult<QueryNamespacesResults> {
        let QueryNamespacesRequest {
            namespaces,
            metric,
            options,
        } = request;

        if namespaces.is_empty() {
            return Err(PineconeError::Validation(
                "At least one namespace must be specified".to_string(),
            ));
        }
        options.validate()?;

        let aggregator = QueryResultsAggregator::new(options.effective_top_k(), metric)?;
        let targets: BTreeSet<String> = namespaces.into_iter().collect();

        let span = tracing::info_span!(
            "query_namespaces",
            namespaces = targets.len(),
            metric = %metric,
            top_k = aggregator.top_k()
        );

        self.fan_out(targets, &options, aggregator)
            .instrument(span)
            .await
    }

    async fn fan_out(
        &self,
        targets: BTreeSet<String>,
        options: &QueryOptions,
        mut aggregator: QueryResultsAggregator,
    ) -> PineconeResult<QueryNamespacesResults> {
        let started = Instant::now();
        let namespace_count = targets.len();

        let mut in_flight = futures::stream::iter(targets)
            .map(|namespace| {
                let request = options.to_request(&namespace);
                async move { self.send(request).await }
            })
            .buffer_unordered(self.pool_threads);

        while let Some(response) = in_flight.next().await {
            aggregator.add_results(response?)?;
        }

        let results = aggregator.into_results();

        tracing::info!(
            namespaces = namespace_count,
            matches = results.matches.len(),
            read_units = results.usage.read_units,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Merged multi-namespace query"
        );

        Ok(results)
    }

    /// Send one request, applying the per-request timeout.
    async fn send(&self, request: QueryRequest) -> PineconeResult<QueryResponse> {
        tracing::debug!(namespace = %request.namespace, "Dispatching query");

        let call = self.client.query(&request);
        let outcome = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(PineconeError::Timeout {
                    namespace: request.namespace.clone(),
                    timeout,
                }),
            },
            None => call.await,
        };

        match &outcome {
            Ok(response) => tracing::debug!(
                namespace = %request.namespace,
                matches = response.matches.len(),
                read_units = response.read_units(),
                "Query completed"
            ),
            Err(e) => tracing::warn!(namespace = %request.namespace, "Query failed: {}", e),
        }

        outcome
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("host", &self.client.host())
            .field("pool_threads", &self.pool_threads)
            .field("timeout", &self.timeout)
            .finish()
    }
}
