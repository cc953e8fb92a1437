//! Rank write-back
//!
//! Each node's `page_rank` is saved independently: one failed write never
//! blocks the rest, and failures are aggregated into a single error listing
//! the affected URLs. A partially persisted run is an accepted degraded
//! state, remedied by re-running the pipeline.

use tracing::warn;

use crate::error::RankError;
use crate::graph::snapshot::GraphSnapshot;
use crate::pagerank::RankResult;
use crate::store::LinkGraphStore;

/// Writes a converged importance vector back to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankPersister;

impl RankPersister {
    /// Create a persister.
    pub fn new() -> Self {
        Self
    }

    /// Save `result.scores[i]` as the `page_rank` of snapshot node `i`.
    ///
    /// Returns the number of nodes written. If any writes fail, every
    /// remaining node is still attempted and the failed URLs come back in
    /// [`RankError::PersistFailed`].
    pub fn persist(
        &self,
        store: &dyn LinkGraphStore,
        snapshot: &GraphSnapshot,
        result: &RankResult,
    ) -> Result<usize, RankError> {
        let mut written = 0;
        let mut failed: Vec<String> = Vec::new();

        for (i, node) in snapshot.nodes().iter().enumerate() {
            let mut updated = node.clone();
            updated.page_rank = Some(result.score(i as u32));

            match store.save(&updated) {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(url = %node.url, error = %e, "failed to persist rank");
                    failed.push(node.url.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(written)
        } else {
            Err(RankError::PersistFailed { urls: failed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryStore;
    use crate::types::{LinkNode, OrderKey};

    /// Store wrapper that rejects saves for chosen URLs.
    struct FlakyStore {
        inner: InMemoryStore,
        reject: Vec<String>,
    }

    impl LinkGraphStore for FlakyStore {
        fn find_all(&self) -> Result<Vec<LinkNode>, StoreError> {
            self.inner.find_all()
        }

        fn find(&self, url: &str) -> Result<Option<LinkNode>, StoreError> {
            self.inner.find(url)
        }

        fn save(&self, node: &LinkNode) -> Result<(), StoreError> {
            if self.reject.iter().any(|u| u == &node.url) {
                return Err(StoreError::new("write rejected"));
            }
            self.inner.save(node)
        }
    }

    fn snapshot_of(urls: &[&str]) -> GraphSnapshot {
        GraphSnapshot::from_nodes(
            urls.iter().map(|u| LinkNode::new(*u)).collect(),
            OrderKey::Url,
        )
    }

    #[test]
    fn test_persist_writes_every_rank() {
        let store = InMemoryStore::with_nodes([LinkNode::new("a"), LinkNode::new("b")]);
        let snapshot = snapshot_of(&["a", "b"]);
        let result = RankResult::new(vec![0.6, 0.4], 5, 1e-5);

        let written = RankPersister::new()
            .persist(&store, &snapshot, &result)
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.find("a").unwrap().unwrap().page_rank, Some(0.6));
        assert_eq!(store.find("b").unwrap().unwrap().page_rank, Some(0.4));
    }

    #[test]
    fn test_one_failure_does_not_block_the_rest() {
        let store = FlakyStore {
            inner: InMemoryStore::with_nodes([
                LinkNode::new("a"),
                LinkNode::new("b"),
                LinkNode::new("c"),
            ]),
            reject: vec!["b".into()],
        };
        let snapshot = snapshot_of(&["a", "b", "c"]);
        let result = RankResult::new(vec![0.5, 0.3, 0.2], 5, 1e-5);

        let err = RankPersister::new()
            .persist(&store, &snapshot, &result)
            .unwrap_err();
        assert_eq!(err, RankError::PersistFailed { urls: vec!["b".into()] });

        // The nodes after the failure were still written.
        assert_eq!(store.inner.find("a").unwrap().unwrap().page_rank, Some(0.5));
        assert_eq!(store.inner.find("c").unwrap().unwrap().page_rank, Some(0.2));
        assert_eq!(store.inner.find("b").unwrap().unwrap().page_rank, None);
    }

    #[test]
    fn test_persist_empty_snapshot_is_noop() {
        let store = InMemoryStore::new();
        let snapshot = snapshot_of(&[]);
        let result = RankResult::new(vec![], 0, 0.0);

        let written = RankPersister::new()
            .persist(&store, &snapshot, &result)
            .unwrap();
        assert_eq!(written, 0);
    }
}
