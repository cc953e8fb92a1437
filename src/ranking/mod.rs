//! Query-time ranking boundary
//!
//! The text indexer is an external collaborator: it hands over candidate
//! URLs with a relevance score, and this module folds in the persisted
//! PageRank through a pluggable combination policy. The combination formula
//! is deliberately a policy object; no single blend is mandated.
//!
//! [`SearchRanker`] is an explicitly owned service instance: it is injected
//! with a store handle and a combiner, never reached through global state.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{RankError, StoreError};
use crate::store::LinkGraphStore;
use crate::types::LinkNode;

/// A query candidate produced by the external text indexer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub url: String,
    pub text_score: f64,
}

impl TextMatch {
    pub fn new(url: impl Into<String>, text_score: f64) -> Self {
        Self {
            url: url.into(),
            text_score,
        }
    }
}

/// One entry of the final query result listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub title: String,
    pub paragraph: String,
    pub url: String,
    /// Combined ordering score.
    pub score: f64,
    /// Persisted PageRank (0 when no rank has been computed yet).
    pub page_rank: f64,
}

/// Policy for blending text relevance with PageRank into one ordering score.
pub trait ScoreCombiner {
    fn combine(&self, text_score: f64, page_rank: f64) -> f64;
}

/// Weighted sum: `text_weight · text + rank_weight · rank`.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSumCombiner {
    pub text_weight: f64,
    pub rank_weight: f64,
}

impl Default for WeightedSumCombiner {
    fn default() -> Self {
        Self {
            text_weight: 1.0,
            rank_weight: 1.0,
        }
    }
}

impl WeightedSumCombiner {
    pub fn new(text_weight: f64, rank_weight: f64) -> Self {
        Self {
            text_weight,
            rank_weight,
        }
    }
}

impl ScoreCombiner for WeightedSumCombiner {
    fn combine(&self, text_score: f64, page_rank: f64) -> f64 {
        self.text_weight * text_score + self.rank_weight * page_rank
    }
}

/// Multiplicative blend: `text · rank`. Zero rank zeroes the result, so this
/// only makes sense once a full ranking run has persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplicativeCombiner;

impl ScoreCombiner for MultiplicativeCombiner {
    fn combine(&self, text_score: f64, page_rank: f64) -> f64 {
        text_score * page_rank
    }
}

/// Combines indexer candidates with persisted ranks into an ordered result
/// list.
pub struct SearchRanker<S, C> {
    store: Arc<S>,
    combiner: C,
}

impl<S: LinkGraphStore, C: ScoreCombiner> SearchRanker<S, C> {
    /// Create a ranker over a store handle and a combination policy.
    pub fn new(store: Arc<S>, combiner: C) -> Self {
        Self { store, combiner }
    }

    /// Produce the ordered result listing for one query's candidates.
    ///
    /// Candidates whose URL is no longer in the store are dropped; a node
    /// without a persisted rank counts as rank 0.
    pub fn rank(&self, candidates: &[TextMatch]) -> Result<Vec<RankedResult>, RankError> {
        let mut results = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let Some(node) = self.store.find(&candidate.url)? else {
                debug!(url = %candidate.url, "candidate vanished from store, dropping");
                continue;
            };

            let page_rank = node.page_rank.unwrap_or(0.0);
            results.push(RankedResult {
                title: node.title,
                paragraph: node.paragraph,
                url: node.url,
                score: self.combiner.combine(candidate.text_score, page_rank),
                page_rank,
            });
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.url.cmp(&b.url)));
        Ok(results)
    }
}

/// Top nodes by incoming-link count, descending.
///
/// Popularity is a store-level back-reference query and does not touch the
/// PageRank machinery.
pub fn popular_by_incoming(
    store: &dyn LinkGraphStore,
    limit: usize,
) -> Result<Vec<LinkNode>, StoreError> {
    let mut nodes = store.find_all()?;
    nodes.sort_by(|a, b| {
        b.incoming_links
            .len()
            .cmp(&a.incoming_links.len())
            .then_with(|| a.url.cmp(&b.url))
    });
    nodes.truncate(limit);
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn ranked_node(url: &str, title: &str, page_rank: f64) -> LinkNode {
        let mut node = LinkNode::new(url).with_title(title);
        node.page_rank = Some(page_rank);
        node
    }

    fn store_with_ranks() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::with_nodes([
            ranked_node("a", "Alpha", 0.5),
            ranked_node("b", "Beta", 0.3),
            ranked_node("c", "Gamma", 0.2),
        ]))
    }

    #[test]
    fn test_rank_orders_by_combined_score() {
        let ranker = SearchRanker::new(store_with_ranks(), WeightedSumCombiner::default());

        // Text relevance favors c, PageRank favors a.
        let results = ranker
            .rank(&[
                TextMatch::new("a", 0.1),
                TextMatch::new("c", 0.9),
            ])
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "c"); // 0.9 + 0.2 > 0.1 + 0.5
        assert_eq!(results[0].title, "Gamma");
        assert!((results[0].score - 1.1).abs() < 1e-12);
        assert!((results[0].page_rank - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_rank_weights_shift_ordering() {
        let ranker = SearchRanker::new(store_with_ranks(), WeightedSumCombiner::new(0.1, 10.0));

        let results = ranker
            .rank(&[TextMatch::new("a", 0.1), TextMatch::new("c", 0.9)])
            .unwrap();

        // Heavy rank weight puts the high-PageRank node first.
        assert_eq!(results[0].url, "a");
    }

    #[test]
    fn test_multiplicative_combiner() {
        let ranker = SearchRanker::new(store_with_ranks(), MultiplicativeCombiner);
        let results = ranker.rank(&[TextMatch::new("b", 2.0)]).unwrap();
        assert!((results[0].score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_candidate_is_dropped() {
        let ranker = SearchRanker::new(store_with_ranks(), WeightedSumCombiner::default());
        let results = ranker
            .rank(&[TextMatch::new("a", 0.5), TextMatch::new("ghost", 0.5)])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "a");
    }

    #[test]
    fn test_unranked_node_counts_as_zero() {
        let store = Arc::new(InMemoryStore::with_nodes([LinkNode::new("fresh")]));
        let ranker = SearchRanker::new(store, WeightedSumCombiner::default());

        let results = ranker.rank(&[TextMatch::new("fresh", 0.4)]).unwrap();
        assert!((results[0].page_rank - 0.0).abs() < 1e-12);
        assert!((results[0].score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_popular_by_incoming_orders_and_limits() {
        let store = InMemoryStore::with_nodes([
            LinkNode::new("a").with_incoming(["x", "y", "z"]),
            LinkNode::new("b").with_incoming(["x"]),
            LinkNode::new("c").with_incoming(["x", "y"]),
        ]);

        let top = popular_by_incoming(&store, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].url, "a");
        assert_eq!(top[1].url, "c");
    }

    #[test]
    fn test_popular_on_empty_store() {
        let store = InMemoryStore::new();
        assert!(popular_by_incoming(&store, 10).unwrap().is_empty());
    }
}
