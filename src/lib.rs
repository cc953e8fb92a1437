//! linkrank — PageRank engine for a crawled web link graph.
//!
//! Pages reference other pages; importance is the stationary distribution of
//! a damped random walk over that link graph. This crate covers the
//! computation core of a minimal search engine:
//!
//! - [`graph::GraphSnapshot`] — a deterministic indexed view of the stored
//!   graph
//! - [`graph::TransitionMatrixBuilder`] — damped row-stochastic matrix
//!   construction, including dangling-node redistribution
//! - [`pagerank::PageRankSolver`] — power iteration with a configurable
//!   stopping criterion and an iteration cap
//! - [`pipeline::RankPipeline`] — the single-flight load → build → solve →
//!   persist batch job
//! - [`ranking`] — the query-time boundary combining text relevance with
//!   persisted ranks
//!
//! Crawling, text indexing, HTTP, and concrete persistence are external
//! collaborators behind the [`store::LinkGraphStore`] trait.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use linkrank::pipeline::{NoopObserver, RankPipeline};
//! use linkrank::store::{InMemoryStore, LinkGraphStore};
//! use linkrank::types::{LinkNode, RankConfig};
//!
//! let store = Arc::new(InMemoryStore::with_nodes([
//!     LinkNode::new("https://a.example").with_outgoing(["https://b.example"]),
//!     LinkNode::new("https://b.example").with_outgoing(["https://a.example"]),
//! ]));
//!
//! let pipeline = RankPipeline::new(store.clone(), RankConfig::default()).unwrap();
//! let summary = pipeline.run(&mut NoopObserver).unwrap();
//! assert_eq!(summary.persisted, 2);
//!
//! let rank = store.find("https://a.example").unwrap().unwrap().page_rank.unwrap();
//! assert!((rank - 0.5).abs() < 0.01);
//! ```

pub mod error;
pub mod graph;
pub mod pagerank;
pub mod pipeline;
pub mod ranking;
pub mod store;
pub mod types;

pub use error::{RankError, StoreError};
pub use graph::{GraphSnapshot, TransitionMatrix, TransitionMatrixBuilder};
pub use pagerank::{PageRankSolver, RankResult};
pub use pipeline::{CancelToken, RankPipeline, RankPersister, RunSummary};
pub use ranking::{ScoreCombiner, SearchRanker};
pub use store::{InMemoryStore, LinkGraphStore};
pub use types::{Convergence, LinkNode, OrderKey, RankConfig};
