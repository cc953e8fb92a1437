//! Error taxonomy for the ranking pipeline.
//!
//! Malformed edges (targets absent from the snapshot) and empty graphs are
//! conditions handled inline, not errors. Everything that aborts or degrades
//! a run surfaces here.

use crate::types::ConfigIssue;

/// Failure reading or writing the link-graph store.
///
/// Concrete store implementations map their own failures into this type;
/// the pipeline never retries internally (retry policy belongs to the
/// caller).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("store access failed: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the ranking pipeline and its components.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// Reading or writing the graph failed outright.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Power iteration hit the iteration cap without meeting the stopping
    /// criterion.
    #[error("no convergence after {iterations} iterations (last delta {delta:.3e})")]
    NonConvergence { iterations: usize, delta: f64 },

    /// Some per-node rank writes failed. Writes are independent, so the
    /// remaining nodes were still attempted; the listed URLs hold stale
    /// ranks until the next successful run.
    #[error("failed to persist ranks for {} node(s): {}", urls.len(), urls.join(", "))]
    PersistFailed { urls: Vec<String> },

    /// Another full pipeline run holds the single-flight lock.
    #[error("a ranking run is already in progress")]
    RunInProgress,

    /// The run was cancelled before the persist phase; prior ranks are
    /// untouched.
    #[error("ranking run cancelled")]
    Cancelled,

    /// The supplied configuration failed validation.
    #[error("invalid configuration: {}", issues.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; "))]
    InvalidConfig { issues: Vec<ConfigIssue> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_failed_lists_urls() {
        let err = RankError::PersistFailed {
            urls: vec!["https://a.example".into(), "https://b.example".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 node(s)"));
        assert!(msg.contains("https://a.example"));
    }

    #[test]
    fn test_store_error_converts() {
        fn fails() -> Result<(), RankError> {
            let read: Result<(), StoreError> = Err(StoreError::new("connection refused"));
            read?;
            Ok(())
        }
        match fails() {
            Err(RankError::Store(e)) => assert!(e.message.contains("refused")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_message_joins_issues() {
        let cfg = crate::types::RankConfig::new().with_alpha(2.0).with_epsilon(0.0);
        let err = RankError::InvalidConfig {
            issues: cfg.validate(),
        };
        let msg = err.to_string();
        assert!(msg.contains("alpha"));
        assert!(msg.contains("epsilon"));
    }
}
