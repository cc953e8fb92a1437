//! Full ranking pipeline: load → build → solve → persist
//!
//! The pipeline is a batch job over a single snapshot of the link graph.
//! Runs are single-flight: overlapping executions could interleave per-node
//! writes computed from different snapshots, so a second caller gets
//! [`crate::error::RankError::RunInProgress`] instead of a lock queue.

pub mod observer;
pub mod persist;
pub mod runner;

pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use persist::RankPersister;
pub use runner::{CancelToken, PreviewEntry, RankPipeline, RunSummary};
