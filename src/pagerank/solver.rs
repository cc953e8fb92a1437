//! Power-iteration solver
//!
//! Repeatedly multiplies the importance estimate by the damped transition
//! matrix until the stopping criterion falls below the threshold. Damping
//! makes the chain irreducible and aperiodic, so the fixed point is unique
//! and any valid starting distribution reaches it.

use tracing::debug;

use super::RankResult;
use crate::error::RankError;
use crate::graph::matrix::TransitionMatrix;
use crate::types::Convergence;

/// Power-iteration PageRank solver.
#[derive(Debug, Clone, Copy)]
pub struct PageRankSolver {
    /// Convergence threshold.
    pub epsilon: f64,
    /// Hard iteration cap; exceeding it is a [`RankError::NonConvergence`].
    pub max_iterations: usize,
    /// Stopping criterion policy.
    pub convergence: Convergence,
}

impl Default for PageRankSolver {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            max_iterations: 10_000,
            convergence: Convergence::Distance,
        }
    }
}

impl PageRankSolver {
    /// Create a solver with default settings.
    pub fn new() -> Self {
        Self::default()
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

    /// Solve from the reference seed: all mass on node 0.
    pub fn solve(&self, matrix: &TransitionMatrix) -> Result<RankResult, RankError> {
        let n = matrix.n();
        let mut seed = vec![0.0; n];
        if n > 0 {
            seed[0] = 1.0;
        }
        self.solve_from(matrix, seed)
    }

    /// Solve from an arbitrary starting distribution.
    ///
    /// The vector is first resized to the node count (short vectors are
    /// zero-padded, long ones truncated), then normalized to unit mass; a
    /// vector left with zero mass falls back to the uniform distribution.
    /// Thanks to damping the fixed point is the same for every valid start,
    /// so the adaptation only affects the iteration count.
    pub fn solve_from(
        &self,
        matrix: &TransitionMatrix,
        initial: Vec<f64>,
    ) -> Result<RankResult, RankError> {
        self.solve_interruptible(matrix, initial, || false)
    }

    /// Solve with a cancellation check between iterations.
    ///
    /// Returns [`RankError::Cancelled`] as soon as `cancelled` reports true;
    /// no partial result escapes.
    pub fn solve_interruptible(
        &self,
        matrix: &TransitionMatrix,
        initial: Vec<f64>,
        cancelled: impl Fn() -> bool,
    ) -> Result<RankResult, RankError> {
        let n = matrix.n();
        if n == 0 {
            return Ok(RankResult::new(Vec::new(), 0, 0.0));
        }
        if n == 1 {
            // A one-node chain has nowhere else to put its mass.
            return Ok(RankResult::new(vec![1.0], 0, 0.0));
        }

        let mut current = normalize_or_uniform(initial, n);
        let mut delta = f64::MAX;

        for iteration in 1..=self.max_iterations {
            if cancelled() {
                return Err(RankError::Cancelled);
            }

            let next = matrix.apply(&current);
            delta = match self.convergence {
                Convergence::Distance => euclidean_distance(&current, &next),
                Convergence::NormDelta => {
                    (euclidean_norm(&current) - euclidean_norm(&next)).abs()
                }
            };
            current = next;

            if delta < self.epsilon {
                debug!(iterations = iteration, delta, "power iteration converged");
                return Ok(RankResult::new(current, iteration, delta));
            }
        }

        // The error reports the criterion value from the last step taken.
        Err(RankError::NonConvergence {
            iterations: self.max_iterations,
            delta,
        })
    }
}

/// Resize to `n` entries (zero-pad or truncate), then normalize to unit
/// mass; falls back to uniform when no mass remains.
fn normalize_or_uniform(mut v: Vec<f64>, n: usize) -> Vec<f64> {
    v.resize(n, 0.0);
    let sum: f64 = v.iter().sum();
    if sum > 0.0 {
        for x in &mut v {
            *x /= sum;
        }
        v
    } else {
        vec![1.0 / n as f64; n]
    }
}

fn euclidean_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
