//! Graph snapshot and transition-matrix construction
//!
//! This module turns the stored link graph into the dense damped
//! row-stochastic matrix that power iteration consumes.

pub mod matrix;
pub mod snapshot;

pub use matrix::{TransitionMatrix, TransitionMatrixBuilder};
pub use snapshot::GraphSnapshot;
