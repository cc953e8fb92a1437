//! Link-graph store boundary
//!
//! The pipeline reads a full snapshot from, and writes ranks back to, an
//! external store. Any storage engine can sit behind [`LinkGraphStore`];
//! the in-memory implementation here backs tests and embedders.

pub mod memory;

pub use memory::InMemoryStore;

use crate::error::StoreError;
use crate::types::LinkNode;

/// Find/save access to the persisted link graph, keyed by URL.
///
/// `save` is an idempotent upsert of a node's mutable fields. Implementations
/// must be `Send + Sync`: the pipeline holds a shared handle and the matrix
/// multiply runs on a thread pool.
pub trait LinkGraphStore: Send + Sync {
    /// Read every node in the graph.
    fn find_all(&self) -> Result<Vec<LinkNode>, StoreError>;

    /// Look up a single node by URL.
    fn find(&self, url: &str) -> Result<Option<LinkNode>, StoreError>;

    /// Insert or update a node.
    fn save(&self, node: &LinkNode) -> Result<(), StoreError>;
}
