//! Immutable graph snapshot with stable URL indexing
//!
//! A snapshot fixes the node set and its row/column assignment for one
//! computation. Indexing uses FxHashMap for O(1) URL lookups during matrix
//! construction.

use rustc_hash::FxHashMap;

use crate::error::StoreError;
use crate::store::LinkGraphStore;
use crate::types::{LinkNode, OrderKey};

/// An immutable view of the link graph at computation time.
///
/// Nodes are held in a deterministic total order; `index_of` maps a URL to
/// its row/column in the transition matrix. Re-loading an unchanged graph
/// yields an identical layout.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Vec<LinkNode>,
    url_to_index: FxHashMap<String, u32>,
}

impl GraphSnapshot {
    /// Build a snapshot from an already-loaded node set.
    ///
    /// Sorts by the configured key. `OrderKey::Title` breaks ties by URL so
    /// the order stays total even when titles collide.
    pub fn from_nodes(mut nodes: Vec<LinkNode>, order_key: OrderKey) -> Self {
        match order_key {
            OrderKey::Url => nodes.sort_by(|a, b| a.url.cmp(&b.url)),
            OrderKey::Title => {
                nodes.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.url.cmp(&b.url)))
            }
        }

        let mut url_to_index =
            FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
        for (i, node) in nodes.iter().enumerate() {
            url_to_index.insert(node.url.clone(), i as u32);
        }

        Self {
            nodes,
            url_to_index,
        }
    }

    /// Load every node from the store and index it.
    ///
    /// A store failure propagates; an empty graph yields an empty snapshot.
    pub fn load(store: &dyn LinkGraphStore, order_key: OrderKey) -> Result<Self, StoreError> {
        let nodes = store.find_all()?;
        Ok(Self::from_nodes(nodes, order_key))
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes in index order.
    pub fn nodes(&self) -> &[LinkNode] {
        &self.nodes
    }

    /// The node at a given index.
    pub fn node(&self, index: u32) -> Option<&LinkNode> {
        self.nodes.get(index as usize)
    }

    /// Resolve a URL to its matrix row/column index.
    pub fn index_of(&self, url: &str) -> Option<u32> {
        self.url_to_index.get(url).copied()
    }

    /// The URL at a given index.
    pub fn url(&self, index: u32) -> Option<&str> {
        self.nodes.get(index as usize).map(|n| n.url.as_str())
    }
}
