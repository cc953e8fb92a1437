//! Pipeline runner — orchestrates load → build → solve → persist.
//!
//! [`RankPipeline`] owns a store handle and a [`RankConfig`] and executes the
//! whole recomputation as one batch. Stage boundaries notify an optional
//! [`PipelineObserver`] and open a `pipeline_stage` tracing span.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, info_span};

use crate::error::RankError;
use crate::graph::matrix::TransitionMatrixBuilder;
use crate::graph::snapshot::GraphSnapshot;
use crate::pagerank::{PageRankSolver, RankResult};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_LOAD, STAGE_MATRIX,
    STAGE_PERSIST, STAGE_SOLVE,
};
use crate::pipeline::persist::RankPersister;
use crate::store::LinkGraphStore;
use crate::types::RankConfig;

/// Cooperative cancellation handle for an in-flight run.
///
/// Cancelling stops further iteration and skips the persist phase; ranks
/// already in the store are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a live (non-cancelled) token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One row of the ranking preview: a URL and its rank rendered to a fixed
/// number of decimal digits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub url: String,
    pub page_rank: String,
}

/// Outcome of a completed pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Nodes in the snapshot.
    pub nodes: usize,
    /// Power-iteration steps taken.
    pub iterations: usize,
    /// Final stopping-criterion value.
    pub delta: f64,
    /// Nodes whose rank was written back.
    pub persisted: usize,
}

/// Batch PageRank pipeline over a [`LinkGraphStore`].
///
/// Runs are single-flight: a second `run` while one is in progress returns
/// [`RankError::RunInProgress`] instead of queueing, since interleaved
/// per-node writes from two snapshots would leave the store inconsistent.
#[derive(Debug)]
pub struct RankPipeline<S> {
    store: Arc<S>,
    config: RankConfig,
    run_lock: Mutex<()>,
}

impl<S: LinkGraphStore> RankPipeline<S> {
    /// Create a pipeline; rejects invalid configuration up front.
    pub fn new(store: Arc<S>, config: RankConfig) -> Result<Self, RankError> {
        let issues = config.validate();
        if !issues.is_empty() {
            return Err(RankError::InvalidConfig { issues });
        }
        Ok(Self {
            store,
            config,
            run_lock: Mutex::new(()),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Execute the full pipeline and persist the resulting ranks.
    pub fn run(&self, observer: &mut impl PipelineObserver) -> Result<RunSummary, RankError> {
        self.run_with_cancel(&CancelToken::new(), observer)
    }

    /// Execute the full pipeline with a cancellation token.
    pub fn run_with_cancel(
        &self,
        cancel: &CancelToken,
        observer: &mut impl PipelineObserver,
    ) -> Result<RunSummary, RankError> {
        let _guard = self
            .run_lock
            .try_lock()
            .ok_or(RankError::RunInProgress)?;

        let (snapshot, result) = self.compute(cancel, observer)?;

        if cancel.is_cancelled() {
            return Err(RankError::Cancelled);
        }

        let _span = info_span!("pipeline_stage", stage = STAGE_PERSIST).entered();
        observer.on_stage_start(STAGE_PERSIST);
        let clock = StageClock::start();
        let persisted = RankPersister::new().persist(&*self.store, &snapshot, &result)?;
        let report = StageReportBuilder::new(clock.elapsed())
            .persisted(persisted)
            .build();
        observer.on_stage_end(STAGE_PERSIST, &report);

        info!(
            nodes = snapshot.len(),
            iterations = result.iterations,
            "page ranks persisted"
        );

        Ok(RunSummary {
            nodes: snapshot.len(),
            iterations: result.iterations,
            delta: result.delta,
            persisted,
        })
    }

    /// Compute ranks without persisting and render the descending preview
    /// listing.
    ///
    /// Preview leaves the store untouched, so it takes no part in the
    /// single-flight lock.
    pub fn preview(&self) -> Result<Vec<PreviewEntry>, RankError> {
        let (snapshot, result) = self.compute(&CancelToken::new(), &mut super::NoopObserver)?;

        let mut entries: Vec<(u32, f64)> = result
            .scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as u32, s))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| {
            // URL tiebreak keeps equal ranks deterministic.
            snapshot.url(a.0).cmp(&snapshot.url(b.0))
        }));

        let decimals = self.config.preview_decimals;
        Ok(entries
            .into_iter()
            .filter_map(|(i, score)| {
                snapshot.url(i).map(|url| PreviewEntry {
                    url: url.to_string(),
                    page_rank: format!("{score:.decimals$}"),
                })
            })
            .collect())
    }

    /// Shared load → build → solve stages.
    fn compute(
        &self,
        cancel: &CancelToken,
        observer: &mut impl PipelineObserver,
    ) -> Result<(GraphSnapshot, RankResult), RankError> {
        let snapshot = {
            let _span = info_span!("pipeline_stage", stage = STAGE_LOAD).entered();
            observer.on_stage_start(STAGE_LOAD);
            let clock = StageClock::start();
            let snapshot = GraphSnapshot::load(&*self.store, self.config.order_key)?;
            let report = StageReportBuilder::new(clock.elapsed())
                .nodes(snapshot.len())
                .build();
            observer.on_stage_end(STAGE_LOAD, &report);
            observer.on_snapshot(&snapshot);
            snapshot
        };

        let matrix = {
            let _span = info_span!("pipeline_stage", stage = STAGE_MATRIX).entered();
            observer.on_stage_start(STAGE_MATRIX);
            let clock = StageClock::start();
            let matrix = TransitionMatrixBuilder::new()
                .with_alpha(self.config.alpha)
                .build(&snapshot);
            let report = StageReport::new(clock.elapsed());
            observer.on_stage_end(STAGE_MATRIX, &report);
            observer.on_matrix(&matrix);
            matrix
        };

        let result = {
            let _span = info_span!("pipeline_stage", stage = STAGE_SOLVE).entered();
            observer.on_stage_start(STAGE_SOLVE);
            let clock = StageClock::start();
            let solver = PageRankSolver::new()
                .with_epsilon(self.config.epsilon)
                .with_max_iterations(self.config.max_iterations)
                .with_convergence(self.config.convergence);
            let n = matrix.n();
            let mut seed = vec![0.0; n];
            if n > 0 {
                seed[0] = 1.0;
            }
            let result =
                solver.solve_interruptible(&matrix, seed, || cancel.is_cancelled())?;
            let report = StageReportBuilder::new(clock.elapsed())
                .iterations(result.iterations)
                .residual(result.delta)
                .build();
            observer.on_stage_end(STAGE_SOLVE, &report);
            observer.on_rank(&result);
            result
        };

        Ok((snapshot, result))
    }
}
