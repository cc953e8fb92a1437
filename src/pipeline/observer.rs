//! Pipeline observer — hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages, capturing intermediate
//! artifacts for debugging, and emitting structured telemetry.

use std::time::{Duration, Instant};

use crate::graph::matrix::TransitionMatrix;
use crate::graph::snapshot::GraphSnapshot;
use crate::pagerank::RankResult;

/// Stage name: snapshot load.
pub const STAGE_LOAD: &str = "load";
/// Stage name: transition-matrix construction.
pub const STAGE_MATRIX: &str = "matrix";
/// Stage name: power iteration.
pub const STAGE_SOLVE: &str = "solve";
/// Stage name: rank write-back.
pub const STAGE_PERSIST: &str = "persist";

/// Wall-clock timer for one stage.
#[derive(Debug)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    /// Start timing.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed time since `start`.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Metrics reported at the end of a stage.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    elapsed: Duration,
    nodes: Option<usize>,
    iterations: Option<usize>,
    residual: Option<f64>,
    persisted: Option<usize>,
}

impl StageReport {
    /// A report carrying only the elapsed time.
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Default::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn residual(&self) -> Option<f64> {
        self.residual
    }

    pub fn persisted(&self) -> Option<usize> {
        self.persisted
    }
}

/// Fluent construction of a [`StageReport`] with optional metrics.
#[derive(Debug)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn nodes(mut self, nodes: usize) -> Self {
        self.report.nodes = Some(nodes);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.report.iterations = Some(iterations);
        self
    }

    pub fn residual(mut self, residual: f64) -> Self {
        self.report.residual = Some(residual);
        self
    }

    pub fn persisted(mut self, persisted: usize) -> Self {
        self.report.persisted = Some(persisted);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Callbacks at pipeline stage boundaries.
///
/// All methods default to no-ops so implementors pick only what they need.
pub trait PipelineObserver {
    /// A stage is about to run.
    fn on_stage_start(&mut self, _stage: &'static str) {}

    /// A stage finished; `report` carries timing and stage metrics.
    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// The snapshot was loaded and indexed.
    fn on_snapshot(&mut self, _snapshot: &GraphSnapshot) {}

    /// The damped transition matrix was built.
    fn on_matrix(&mut self, _matrix: &TransitionMatrix) {}

    /// Power iteration converged.
    fn on_rank(&mut self, _result: &RankResult) {}
}

/// Observer that does nothing; zero overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records a timing report per stage, in execution order.
#[derive(Debug, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    /// Create an empty timing observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected reports, in stage execution order.
    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}
