//! Bounded top-k merge of per-namespace query results.
//!
//! Each namespace returns its own page of already-scored matches. The
//! aggregator keeps the `top_k` best matches seen so far in a bounded
//! heap, sums read units across responses, and hands back one ranked
//! list once every response has been added.
//!
//! Ordering is decided once, at construction: the score is mapped to a
//! key where larger is always better (the raw score for cosine and
//! dotproduct, the negated score for euclidean), so a single heap
//! discipline serves every metric. Among equal keys the earlier-inserted
//! match ranks first.

use crate::results::{NamespacedMatch, QueryNamespacesResults};
use crate::types::{Metric, QueryResponse, ScoredVector, Usage};
use pinecone_core::{PineconeError, PineconeResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Upper bound on the heap space reserved at construction; larger `top_k`
/// values grow the heap on demand.
const INITIAL_HEAP_CAPACITY: usize = 1024;

/// Direction in which scores improve, fixed per aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreOrder {
    HigherIsBetter,
    LowerIsBetter,
}

impl ScoreOrder {
    fn for_metric(metric: Metric) -> Self {
        if metric.higher_is_better() {
            Self::HigherIsBetter
        } else {
            Self::LowerIsBetter
        }
    }

    /// Map a score to a key where larger is better.
    fn key(self, score: f32) -> f32 {
        match self {
            Self::HigherIsBetter => score,
            Self::LowerIsBetter => -score,
        }
    }
}

/// A kept match plus the data needed to rank it.
#[derive(Debug)]
struct HeapEntry {
    key: f32,
    seq: u64,
    matched: ScoredVector,
    namespace: String,
}

// Worse entries compare greater, so the max-heap root is the worst kept match
// and `into_sorted_vec` yields best-first order.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Merges per-namespace query responses into one global top-k.
///
/// Single-use: feed it with [`add_results`](Self::add_results) from one
/// task, then read it once with [`get_results`](Self::get_results).
/// Later calls to `get_results` return the same cached value; later calls
/// to `add_results` fail with [`PineconeError::ResultsAlreadyRead`].
///
/// # Example
/// ```
/// use pinecone_data::{Metric, QueryResponse, QueryResultsAggregator, ScoredVector, Usage};
///
/// let mut aggregator = QueryResultsAggregator::new(2, Metric::Cosine).unwrap();
/// aggregator
///     .add_results(QueryResponse {
///         matches: vec![ScoredVector::new("a", 0.9), ScoredVector::new("b", 0.5)],
///         namespace: "x".to_string(),
///         usage: Some(Usage::new(3)),
///     })
///     .unwrap();
///
/// let results = aggregator.get_results();
/// assert_eq!(results.matches[0].id, "a");
/// assert_eq!(results.usage.read_units, 3);
/// ```
#[derive(Debug)]
pub struct QueryResultsAggregator {
    top_k: usize,
    order: ScoreOrder,
    heap: BinaryHeap<HeapEntry>,
    insertion_counter: u64,
    usage_read_units: u64,
    final_results: Option<QueryNamespacesResults>,
}

impl QueryResultsAggregator {
    /// Create an aggregator keeping the `top_k` best matches under `metric`.
    ///
    /// # Errors
    /// Returns [`PineconeError::InvalidTopK`] when `top_k` is zero.
    pub fn new(top_k: usize, metric: Metric) -> PineconeResult<Self> {
        if top_k < 1 {
            return Err(PineconeError::InvalidTopK(top_k as i64));
        }

        Ok(Self {
            top_k,
            order: ScoreOrder::for_metric(metric),
            heap: BinaryHeap::with_capacity(top_k.min(INITIAL_HEAP_CAPACITY)),
            insertion_counter: 0,
            usage_read_units: 0,
            final_results: None,
        })
    }

    /// Create an aggregator from unchecked input, such as CLI arguments.
    ///
    /// # Errors
    /// [`PineconeError::InvalidTopK`] for `top_k < 1`,
    /// [`PineconeError::UnsupportedMetric`] for an unknown metric name.
    pub fn parse(top_k: i64, metric: &str) -> PineconeResult<Self> {
        let top_k = usize::try_from(top_k).map_err(|_| PineconeError::InvalidTopK(top_k))?;
        let metric: Metric = metric.parse()?;
        Self::new(top_k, metric)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Number of matches currently kept.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether results have already been drained.
    pub fn is_read(&self) -> bool {
        self.final_results.is_some()
    }

    /// Fold one namespace's response into the running top-k.
    ///
    /// Matches within a response must arrive best-first, as the service
    /// returns them: once a match fails to beat the worst kept entry, the
    /// rest of that response is skipped without being compared.
    ///
    /// # Errors
    /// [`PineconeError::ResultsAlreadyRead`] if results were already read.
    /// Nothing is recorded in that case.
    pub fn add_results(&mut self, response: QueryResponse) -> PineconeResult<()> {
        if self.is_read() {
            return Err(PineconeError::ResultsAlreadyRead);
        }

        self.usage_read_units += response.read_units();

        let QueryResponse {
            matches, namespace, ..
        } = response;

        let total = matches.len();
        for (position, matched) in matches.into_iter().enumerate() {
            self.insertion_counter += 1;
            let entry = HeapEntry {
                key: self.order.key(matched.score),
                seq: self.insertion_counter,
                matched,
                namespace: namespace.clone(),
            };

            if self.heap.len() < self.top_k {
                self.heap.push(entry);
                continue;
            }

            let Some(mut worst) = self.heap.peek_mut() else {
                break;
            };
            if entry.key.total_cmp(&worst.key) != Ordering::Greater {
                tracing::debug!(
                    namespace = %namespace,
                    skipped = total - position,
                    "Remaining matches cannot enter the top-k"
                );
                break;
            }
            // Replacing the root through PeekMut re-sifts on drop.
            *worst = entry;
        }

        Ok(())
    }

    /// Decode a raw JSON response and fold it in.
    ///
    /// Accepts both `readUnits` and `read_units` under `usage`; missing
    /// `matches` or `usage` count as empty.
    pub fn add_json_results(&mut self, raw: serde_json::Value) -> PineconeResult<()> {
        if self.is_read() {
            return Err(PineconeError::ResultsAlreadyRead);
        }
        let response: QueryResponse = serde_json::from_value(raw)?;
        self.add_results(response)
    }

    /// Drain the kept matches into best-first order.
    ///
    /// The first call consumes the heap; every later call returns the same
    /// results without recomputing.
    pub fn get_results(&mut self) -> &QueryNamespacesResults {
        let heap = &mut self.heap;
        let usage_read_units = self.usage_read_units;
        self.final_results.get_or_insert_with(|| {
            let matches = std::mem::take(heap)
                .into_sorted_vec()
                .into_iter()
                .map(|entry| NamespacedMatch::new(entry.matched, entry.namespace))
                .collect();
            QueryNamespacesResults {
                usage: Usage::new(usage_read_units),
                matches,
            }
        })
    }

    /// Drain and take ownership of the results.
    pub fn into_results(mut self) -> QueryNamespacesResults {
        self.get_results();
        self.final_results.take().unwrap_or_default()
    }
}
