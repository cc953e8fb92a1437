//! Core domain types
//!
//! This module defines the link-graph node model and the configuration
//! for a PageRank run.

use serde::{Deserialize, Serialize};

/// One node in the crawled link graph, keyed by its URL.
///
/// `outgoing_links` drives the PageRank computation; `incoming_links` is
/// back-reference data maintained by the store for popularity queries and is
/// never consumed by the solver itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    /// Unique identifier, stable across recomputations.
    pub url: String,
    /// Page title (descriptive, opaque to the ranking core).
    #[serde(default)]
    pub title: String,
    /// Extracted body text (descriptive, opaque to the ranking core).
    #[serde(default)]
    pub paragraph: String,
    /// URLs this page references. May contain targets absent from the
    /// current snapshot; those are skipped during matrix construction.
    #[serde(default)]
    pub outgoing_links: Vec<String>,
    /// URLs that reference this page, maintained by the store.
    #[serde(default)]
    pub incoming_links: Vec<String>,
    /// Relevance score from the external text indexer; unset until computed.
    #[serde(default)]
    pub text_score: Option<f64>,
    /// Persisted PageRank in [0, 1]; written exclusively by the persister.
    #[serde(default)]
    pub page_rank: Option<f64>,
}

impl LinkNode {
    /// Create a node with the given URL and no edges.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            paragraph: String::new(),
            outgoing_links: Vec::new(),
            incoming_links: Vec::new(),
            text_score: None,
            page_rank: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body text.
    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraph = paragraph.into();
        self
    }

    /// Set the outgoing links.
    pub fn with_outgoing(mut self, links: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.outgoing_links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Set the incoming links.
    pub fn with_incoming(mut self, links: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.incoming_links = links.into_iter().map(Into::into).collect();
        self
    }
}

/// Stopping criterion for power iteration.
///
/// `Distance` is the recommended default: it compares the Euclidean distance
/// between consecutive estimates. `NormDelta` compares only the scalar
/// magnitudes of consecutive estimates, which can report convergence for
/// vectors of equal length but different direction; it exists for
/// compatibility with systems that used that test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// Euclidean distance between consecutive vectors.
    #[default]
    Distance,
    /// Absolute difference of consecutive vector magnitudes.
    NormDelta,
}

/// Key used to assign snapshot indices.
///
/// The snapshot ordering must be a deterministic total order so repeated
/// computations over an unchanged graph produce identical matrix layouts.
/// `Url` orders by the unique URL. `Title` orders by page title with a URL
/// tiebreak (titles alone are not collision-free).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    /// Lexicographic by URL (collision-free).
    #[default]
    Url,
    /// Lexicographic by title, then URL.
    Title,
}

/// Configuration for a full PageRank run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    /// Teleportation probability: the chance the random walk jumps to a
    /// uniformly random node instead of following an edge.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Convergence threshold for the stopping criterion.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Iteration cap; exceeding it is a non-convergence error.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Stopping criterion policy.
    #[serde(default)]
    pub convergence: Convergence,
    /// Snapshot ordering policy.
    #[serde(default)]
    pub order_key: OrderKey,
    /// Decimal digits used when rendering ranks in the preview listing.
    #[serde(default = "default_preview_decimals")]
    pub preview_decimals: usize,
}

fn default_alpha() -> f64 {
    0.1
}

fn default_epsilon() -> f64 {
    1e-4
}

fn default_max_iterations() -> usize {
    10_000
}

fn default_preview_decimals() -> usize {
    10
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            convergence: Convergence::default(),
            order_key: OrderKey::default(),
            preview_decimals: default_preview_decimals(),
        }
    }
}

impl RankConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the teleportation probability.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the stopping criterion.
    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    /// Set the snapshot ordering key.
    pub fn with_order_key(mut self, order_key: OrderKey) -> Self {
        self.order_key = order_key;
        self
    }

    /// Check every field and collect all problems at once rather than
    /// stopping at the first.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            issues.push(ConfigIssue::AlphaOutOfRange(self.alpha));
        }
        if !(self.epsilon > 0.0) {
            issues.push(ConfigIssue::EpsilonNotPositive(self.epsilon));
        }
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::ZeroIterationCap);
        }
        issues
    }

    /// Returns `true` if `validate` finds no problems.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// A single configuration problem found by [`RankConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigIssue {
    /// Alpha must lie in (0, 1]; the damped matrix is only guaranteed
    /// irreducible when some teleportation mass exists.
    #[error("alpha must be in (0, 1], got {0}")]
    AlphaOutOfRange(f64),
    #[error("epsilon must be positive, got {0}")]
    EpsilonNotPositive(f64),
    #[error("max_iterations must be at least 1")]
    ZeroIterationCap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference() {
        let cfg = RankConfig::default();
        assert!((cfg.alpha - 0.1).abs() < 1e-12);
        assert!((cfg.epsilon - 1e-4).abs() < 1e-12);
        assert_eq!(cfg.max_iterations, 10_000);
        assert_eq!(cfg.convergence, Convergence::Distance);
        assert_eq!(cfg.order_key, OrderKey::Url);
        assert_eq!(cfg.preview_decimals, 10);
    }

    #[test]
    fn test_builder_methods() {
        let cfg = RankConfig::new()
            .with_alpha(0.15)
            .with_epsilon(1e-6)
            .with_max_iterations(500)
            .with_convergence(Convergence::NormDelta)
            .with_order_key(OrderKey::Title);
        assert!((cfg.alpha - 0.15).abs() < 1e-12);
        assert_eq!(cfg.max_iterations, 500);
        assert_eq!(cfg.convergence, Convergence::NormDelta);
        assert_eq!(cfg.order_key, OrderKey::Title);
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let cfg = RankConfig::new()
            .with_alpha(0.0)
            .with_epsilon(-1.0)
            .with_max_iterations(0);
        let issues = cfg.validate();
        assert_eq!(issues.len(), 3);
        assert!(!cfg.is_valid());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(RankConfig::default().is_valid());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{ "alpha": 0.2, "convergence": "norm_delta" }"#;
        let cfg: RankConfig = serde_json::from_str(json).unwrap();
        assert!((cfg.alpha - 0.2).abs() < 1e-12);
        assert_eq!(cfg.convergence, Convergence::NormDelta);
        // Unspecified fields fall back to defaults.
        assert_eq!(cfg.max_iterations, 10_000);
    }

    #[test]
    fn test_link_node_serde_roundtrip() {
        let node = LinkNode::new("https://a.example")
            .with_title("A")
            .with_outgoing(["https://b.example"]);
        let json = serde_json::to_string(&node).unwrap();
        let back: LinkNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_link_node_deserialize_minimal() {
        let json = r#"{ "url": "https://a.example" }"#;
        let node: LinkNode = serde_json::from_str(json).unwrap();
        assert!(node.outgoing_links.is_empty());
        assert!(node.page_rank.is_none());
    }
}
