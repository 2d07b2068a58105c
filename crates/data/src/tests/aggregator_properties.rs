//! Tests for top-k merge correctness across namespaces.

use crate::aggregator::QueryResultsAggregator;
use crate::types::{Metric, QueryResponse, ScoredVector, Usage};
use pinecone_core::PineconeError;

/// Helper to build one namespace's response, best match first.
fn batch(namespace: &str, matches: &[(&str, f32)], read_units: u64) -> QueryResponse {
    QueryResponse {
        matches: matches
            .iter()
            .map(|(id, score)| ScoredVector::new(*id, *score))
            .collect(),
        namespace: namespace.to_string(),
        usage: Some(Usage::new(read_units)),
    }
}

/// Ground truth: stable sort of every match, then take `top_k`.
fn brute_force_top_k(
    batches: &[QueryResponse],
    top_k: usize,
    metric: Metric,
) -> Vec<(String, String)> {
    let mut all: Vec<(f32, String, String)> = batches
        .iter()
        .flat_map(|b| {
            b.matches
                .iter()
                .map(move |m| (m.score, m.id.clone(), b.namespace.clone()))
        })
        .collect();
    all.sort_by(|a, b| {
        if metric.higher_is_better() {
            b.0.total_cmp(&a.0)
        } else {
            a.0.total_cmp(&b.0)
        }
    });
    all.into_iter()
        .take(top_k)
        .map(|(_, id, ns)| (ns, id))
        .collect()
}

fn merged(batches: &[QueryResponse], top_k: usize, metric: Metric) -> Vec<(String, String)> {
    let mut aggregator = QueryResultsAggregator::new(top_k, metric).unwrap();
    for b in batches {
        aggregator.add_results(b.clone()).unwrap();
    }
    aggregator
        .get_results()
        .matches
        .iter()
        .map(|m| (m.namespace.clone(), m.id.clone()))
        .collect()
}

/// Deterministic pseudo-random batches, each sorted best-first.
fn generated_batches(seed: u64, metric: Metric) -> Vec<QueryResponse> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) % 10_000) as f32 / 10_000.0
    };

    (0..4)
        .map(|n| {
            let mut scores: Vec<f32> = (0..8).map(|_| next()).collect();
            scores.sort_by(|a, b| {
                if metric.higher_is_better() {
                    b.total_cmp(a)
                } else {
                    a.total_cmp(b)
                }
            });
            let namespace = format!("ns{}", n);
            QueryResponse {
                matches: scores
                    .iter()
                    .enumerate()
                    .map(|(i, s)| ScoredVector::new(format!("{}-{}", namespace, i), *s))
                    .collect(),
                namespace,
                usage: Some(Usage::new(n as u64 + 1)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_example_picks_global_best() {
        let mut aggregator = QueryResultsAggregator::new(2, Metric::Cosine).unwrap();
        aggregator
            .add_results(batch("x", &[("x1", 0.9), ("x2", 0.5)], 3))
            .unwrap();
        // Namespace "y" arrives out of score order on purpose.
        aggregator
            .add_results(batch("y", &[("y1", 0.8), ("y2", 0.95)], 4))
            .unwrap();

        let results = aggregator.get_results();
        assert_eq!(results.matches.len(), 2);
        assert_eq!(results.matches[0].score, 0.95);
        assert_eq!(results.matches[0].namespace, "y");
        assert_eq!(results.matches[1].score, 0.9);
        assert_eq!(results.matches[1].namespace, "x");
        assert_eq!(results.usage.read_units, 7);
    }

    #[test]
    fn test_euclidean_example_prefers_lower_scores() {
        let mut aggregator = QueryResultsAggregator::new(3, Metric::Euclidean).unwrap();
        aggregator
            .add_results(batch("a", &[("a1", 1.0), ("a2", 5.0)], 1))
            .unwrap();
        aggregator
            .add_results(batch("b", &[("b1", 2.0), ("b2", 0.5), ("b3", 9.0)], 1))
            .unwrap();

        let scores: Vec<f32> = aggregator
            .get_results()
            .matches
            .iter()
            .map(|m| m.score)
            .collect();
        assert_eq!(scores, vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_tie_goes_to_earlier_insertion() {
        let mut aggregator = QueryResultsAggregator::new(1, Metric::Cosine).unwrap();
        aggregator.add_results(batch("a", &[("a1", 0.7)], 1)).unwrap();
        aggregator.add_results(batch("b", &[("b1", 0.7)], 1)).unwrap();

        let results = aggregator.get_results();
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.matches[0].namespace, "a");
    }

    #[test]
    fn test_tie_within_top_k_ranks_earlier_first() {
        let mut aggregator = QueryResultsAggregator::new(2, Metric::Euclidean).unwrap();
        aggregator.add_results(batch("a", &[("a1", 0.3)], 1)).unwrap();
        aggregator.add_results(batch("b", &[("b1", 0.3)], 1)).unwrap();

        let namespaces: Vec<&str> = aggregator
            .get_results()
            .matches
            .iter()
            .map(|m| m.namespace.as_str())
            .collect();
        assert_eq!(namespaces, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            QueryResultsAggregator::parse(0, "cosine"),
            Err(PineconeError::InvalidTopK(0))
        ));
        assert!(matches!(
            QueryResultsAggregator::parse(-1, "cosine"),
            Err(PineconeError::InvalidTopK(-1))
        ));
        assert!(matches!(
            QueryResultsAggregator::parse(3, "manhattan"),
            Err(PineconeError::UnsupportedMetric(m)) if m == "manhattan"
        ));
    }

    #[test]
    fn test_read_then_write_is_rejected() {
        let mut aggregator = QueryResultsAggregator::new(2, Metric::Cosine).unwrap();
        aggregator.add_results(batch("a", &[("a1", 0.4)], 2)).unwrap();
        let first = aggregator.get_results().clone();

        let err = aggregator
            .add_results(batch("b", &[("b1", 0.99)], 5))
            .unwrap_err();
        assert!(err.to_string().contains("already been read"));

        // Nothing from the rejected batch leaks into the cached results.
        let second = aggregator.get_results();
        assert_eq!(second, &first);
        assert_eq!(second.usage.read_units, 2);
    }

    #[test]
    fn test_repeated_reads_return_same_results() {
        let mut aggregator = QueryResultsAggregator::new(3, Metric::Dotproduct).unwrap();
        aggregator
            .add_results(batch("a", &[("a1", 3.0), ("a2", 1.0)], 1))
            .unwrap();
        let first = aggregator.get_results().clone();
        let second = aggregator.get_results().clone();
        assert_eq!(first, second);
        assert_eq!(first.matches.len(), 2);
    }

    #[test]
    fn test_bounded_size_after_every_batch() {
        let batches = generated_batches(7, Metric::Cosine);
        let mut aggregator = QueryResultsAggregator::new(5, Metric::Cosine).unwrap();
        for b in batches {
            aggregator.add_results(b).unwrap();
            assert!(aggregator.len() <= 5);
        }
    }

    #[test]
    fn test_matches_brute_force_for_every_metric() {
        for metric in [Metric::Cosine, Metric::Dotproduct, Metric::Euclidean] {
            for seed in 1..20 {
                let batches = generated_batches(seed, metric);
                for top_k in [1, 3, 10, 40] {
                    assert_eq!(
                        merged(&batches, top_k, metric),
                        brute_force_top_k(&batches, top_k, metric),
                        "metric={} seed={} top_k={}",
                        metric,
                        seed,
                        top_k
                    );
                }
            }
        }
    }

    #[test]
    fn test_arrival_order_does_not_change_untied_results() {
        let batches = vec![
            batch("a", &[("a1", 0.91), ("a2", 0.52), ("a3", 0.13)], 1),
            batch("b", &[("b1", 0.88), ("b2", 0.77), ("b3", 0.04)], 2),
            batch("c", &[("c1", 0.99), ("c2", 0.35)], 3),
        ];
        let mut reversed = batches.clone();
        reversed.reverse();

        assert_eq!(
            merged(&batches, 4, Metric::Cosine),
            merged(&reversed, 4, Metric::Cosine)
        );
    }

    #[test]
    fn test_usage_sums_regardless_of_order() {
        let batches = generated_batches(3, Metric::Euclidean);
        let expected: u64 = batches.iter().map(|b| b.read_units()).sum();

        let mut forward = QueryResultsAggregator::new(2, Metric::Euclidean).unwrap();
        let mut backward = QueryResultsAggregator::new(2, Metric::Euclidean).unwrap();
        for b in &batches {
            forward.add_results(b.clone()).unwrap();
        }
        for b in batches.iter().rev() {
            backward.add_results(b.clone()).unwrap();
        }

        assert_eq!(forward.get_results().usage.read_units, expected);
        assert_eq!(backward.get_results().usage.read_units, expected);
    }
}
