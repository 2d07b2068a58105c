//! In-memory index client for tests and offline use.

use crate::client::IndexClient;
use crate::types::{QueryRequest, QueryResponse};
use pinecone_core::{PineconeError, PineconeResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock client answering from canned per-namespace responses.
///
/// Namespaces without a canned response answer with no matches and zero
/// usage. Every request is recorded so tests can inspect what was sent.
#[derive(Debug, Default)]
pub struct MockIndexClient {
    responses: HashMap<String, QueryResponse>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    requests: Mutex<Vec<QueryRequest>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockIndexClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries against `namespace` with `response`.
    ///
    /// The response's `namespace` field is overwritten with `namespace`.
    pub fn with_response(mut self, namespace: impl Into<String>, mut response: QueryResponse) -> Self {
        let namespace = namespace.into();
        response.namespace = namespace.clone();
        self.responses.insert(namespace, response);
        self
    }

    /// Wait `delay` before answering queries against `namespace`.
    pub fn with_delay(mut self, namespace: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(namespace.into(), delay);
        self
    }

    /// Fail queries against `namespace` with an API error carrying `message`.
    pub fn with_failure(mut self, namespace: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(namespace.into(), message.into());
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Highest number of queries observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IndexClient for MockIndexClient {
    fn host(&self) -> &str {
        "mock://index"
    }

    async fn query(&self, request: &QueryRequest) -> PineconeResult<QueryResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&request.namespace) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.failures.get(&request.namespace) {
            return Err(PineconeError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        let mut response = self
            .responses
            .get(&request.namespace)
            .cloned()
            .unwrap_or_else(|| QueryResponse {
                namespace: request.namespace.clone(),
                ..QueryResponse::default()
            });
        response.matches.truncate(request.top_k);
        Ok(response)
    }
}
