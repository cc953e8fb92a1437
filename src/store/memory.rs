//! In-memory link-graph store
//!
//! Reference [`LinkGraphStore`] implementation over an RwLock'd map. Used by
//! tests and by embedders that crawl into memory before ranking.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::LinkGraphStore;
use crate::error::StoreError;
use crate::types::LinkNode;

/// Thread-safe in-memory store keyed by URL.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    nodes: RwLock<FxHashMap<String, LinkNode>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given nodes.
    pub fn with_nodes(nodes: impl IntoIterator<Item = LinkNode>) -> Self {
        let store = Self::new();
        {
            let mut map = store.nodes.write();
            for node in nodes {
                map.insert(node.url.clone(), node);
            }
        }
        store
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns `true` if the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl LinkGraphStore for InMemoryStore {
    fn find_all(&self) -> Result<Vec<LinkNode>, StoreError> {
        Ok(self.nodes.read().values().cloned().collect())
    }

    fn find(&self, url: &str) -> Result<Option<LinkNode>, StoreError> {
        Ok(self.nodes.read().get(url).cloned())
    }

    fn save(&self, node: &LinkNode) -> Result<(), StoreError> {
        self.nodes
            .write()
            .insert(node.url.clone(), node.clone());
        Ok(())
    }
}
