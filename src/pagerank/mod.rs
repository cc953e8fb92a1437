//! PageRank solving
//!
//! Power iteration over the damped transition matrix, with a configurable
//! stopping criterion and a hard iteration cap.

pub mod solver;

pub use solver::PageRankSolver;

/// Result of a converged PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankResult {
    /// Importance score per node, aligned with the snapshot index.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Value of the stopping criterion at the final step.
    pub delta: f64,
}

impl RankResult {
    /// Create a new result.
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64) -> Self {
        Self {
            scores,
            iterations,
            delta,
        }
    }

    /// Get the score for a specific node index.
    pub fn score(&self, index: u32) -> f64 {
        self.scores.get(index as usize).copied().unwrap_or(0.0)
    }

    /// Get the top N node indices by score, descending.
    pub fn top_n(&self, n: usize) -> Vec<(u32, f64)> {
        let mut indexed: Vec<_> = self
            .scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as u32, s))
            .collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
        indexed.truncate(n);
        indexed
    }

    /// Sum of all scores; 1.0 within tolerance for a converged result.
    pub fn total_mass(&self) -> f64 {
        self.scores.iter().sum()
    }
}
