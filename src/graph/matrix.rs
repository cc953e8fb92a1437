//! Damped row-stochastic transition matrix
//!
//! Dense row-major storage. After damping every entry is positive, so a
//! sparse layout would buy nothing here; the O(n²) footprint is the accepted
//! bound on single-machine graph size.

use rayon::prelude::*;
use tracing::debug;

use super::snapshot::GraphSnapshot;

/// Below this node count the matrix-vector multiply runs sequentially;
/// thread fan-out costs more than it saves on small graphs.
const PARALLEL_CUTOFF: usize = 256;

/// An n×n one-step transition matrix for the damped random walk.
///
/// Entry `(i, j)` is the probability that a walk at node `i` moves to node
/// `j`. Every row sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    data: Vec<f64>,
}

impl TransitionMatrix {
    /// Number of nodes (rows and columns).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns `true` for the zero-node matrix.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// The entry at `(row, col)`.
    pub fn get(&self, row: u32, col: u32) -> f64 {
        self.data[row as usize * self.n + col as usize]
    }

    /// One full row as a slice.
    pub fn row(&self, row: u32) -> &[f64] {
        let start = row as usize * self.n;
        &self.data[start..start + self.n]
    }

    /// Sum of one row; 1.0 within floating-point tolerance by construction.
    pub fn row_sum(&self, row: u32) -> f64 {
        self.row(row).iter().sum()
    }

    /// One power-iteration step: the row vector `v` times this matrix.
    ///
    /// Rows are independent, so large matrices fan out across the rayon
    /// pool; small ones stay sequential.
    pub fn apply(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.n);

        if self.n < PARALLEL_CUTOFF {
            let mut out = vec![0.0; self.n];
            for (i, &vi) in v.iter().enumerate() {
                if vi == 0.0 {
                    continue;
                }
                for (o, &m) in out.iter_mut().zip(self.row(i as u32)) {
                    *o += vi * m;
                }
            }
            return out;
        }

        v.par_iter()
            .enumerate()
            .fold(
                || vec![0.0; self.n],
                |mut acc, (i, &vi)| {
                    if vi != 0.0 {
                        for (a, &m) in acc.iter_mut().zip(self.row(i as u32)) {
                            *a += vi * m;
                        }
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0; self.n],
                |mut left, right| {
                    for (l, r) in left.iter_mut().zip(right) {
                        *l += r;
                    }
                    left
                },
            )
    }
}

/// Builds the damped transition matrix from a [`GraphSnapshot`].
///
/// Construction follows the random-walk model: with probability `1 − α` the
/// walk follows an outgoing edge (uniformly among valid ones, or uniformly
/// among all nodes if the row is dangling); with probability `α` it
/// teleports to a uniformly random node.
#[derive(Debug, Clone, Copy)]
pub struct TransitionMatrixBuilder {
    /// Teleportation probability.
    pub alpha: f64,
}

impl Default for TransitionMatrixBuilder {
    fn default() -> Self {
        Self { alpha: 0.1 }
    }
}

impl TransitionMatrixBuilder {
    /// Create a builder with the default teleportation probability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the teleportation probability.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Construct the damped row-stochastic matrix.
    ///
    /// Edge targets absent from the snapshot are skipped: they contribute no
    /// probability mass and never fault. Duplicate edges to the same target
    /// accumulate. A row with zero valid edges becomes the uniform `1/n`
    /// distribution before damping.
    pub fn build(&self, snapshot: &GraphSnapshot) -> TransitionMatrix {
        let n = snapshot.len();
        let mut data = vec![0.0; n * n];
        if n == 0 {
            return TransitionMatrix { n, data };
        }

        let uniform = 1.0 / n as f64;
        let mut resolved: Vec<u32> = Vec::new();

        for (i, node) in snapshot.nodes().iter().enumerate() {
            resolved.clear();
            for target in &node.outgoing_links {
                match snapshot.index_of(target) {
                    Some(col) => resolved.push(col),
                    None => {
                        debug!(source = %node.url, target = %target, "edge target not in snapshot, skipping");
                    }
                }
            }

            let row = &mut data[i * n..(i + 1) * n];
            if resolved.is_empty() {
                // Dangling node: redistribute its mass uniformly so rank is
                // not absorbed and lost.
                row.fill(uniform);
            } else {
                let share = 1.0 / resolved.len() as f64;
                for &col in &resolved {
                    row[col as usize] += share;
                }
            }
        }

        // Damping: M' = (1 − α)·M + α·U. Keeps the chain irreducible and
        // aperiodic for any α > 0, so the stationary distribution is unique.
        let follow = 1.0 - self.alpha;
        let teleport = self.alpha * uniform;
        for entry in &mut data {
            *entry = follow * *entry + teleport;
        }

        TransitionMatrix { n, data }
    }
}
