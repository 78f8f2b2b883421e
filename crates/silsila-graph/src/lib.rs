//! Silsila Graph - Knowledge-graph traversal and pathfinding
//!
//! This crate builds an immutable entity/relationship graph and answers
//! traversal queries over it: shortest path, exhaustive simple-path
//! enumeration, bounded neighborhood exploration, induced subgraphs,
//! relationship-strength scoring, and thematic clustering.
//!
//! # Architecture
//!
//! The graph uses petgraph internally as an id-addressed arena, with a
//! precomputed [`AdjacencyIndex`] that owns traversal order. Every algorithm
//! is written once against the [`GraphSource`] capability so that it runs
//! unchanged over the in-process graph ([`MemoryGraph`]) or a remote backing
//! store with asynchronous lookups.
//!
//! # Example
//!
//! ```no_run
//! use silsila_core::{Entity, EntityKind};
//! use silsila_graph::{GraphBuilder, MemoryGraph, PathFinder, Relationship, RelationKind};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), silsila_core::GraphError> {
//! let mut builder = GraphBuilder::new();
//! builder.add_entity(Entity::new("person:yusuf", "Yusuf", EntityKind::Person));
//! builder.add_entity(Entity::new("place:misr", "Egypt", EntityKind::Place));
//! builder.add_relationship(Relationship::new(
//!     "rel:1", "person:yusuf", "place:misr", RelationKind::LivedIn,
//! ));
//! let graph = Arc::new(builder.build()?);
//!
//! let finder = PathFinder::new(MemoryGraph::new(graph));
//! let path = finder
//!     .shortest_path("person:yusuf", "place:misr", None, 4)
//!     .await?;
//! assert_eq!(path.unwrap().len(), 1);
//! # Ok(())
//! # }
//! ```

mod adjacency;
mod builder;
mod cluster;
mod graph;
mod neighborhood;
mod path;
mod relation;
mod score;
mod source;
mod store;
mod subgraph;

pub use adjacency::{AdjacencyEntry, AdjacencyIndex};
pub use builder::GraphBuilder;
pub use cluster::{ThematicClusterer, ThematicLink, CONNECT_MAX_HOPS};
pub use graph::{GraphStats, KnowledgeGraph};
pub use neighborhood::{DiscoveredNode, Neighborhood, NeighborhoodExplorer};
pub use path::{Path, PathFinder};
pub use relation::{GraphEdge, RelationKind, Relationship};
pub use score::{StrengthScore, StrengthScorer};
pub use source::{GraphSource, MemoryGraph};
pub use store::{GraphStore, StoreError};
pub use subgraph::{Subgraph, SubgraphExtractor};
