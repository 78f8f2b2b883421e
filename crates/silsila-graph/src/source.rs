//! The abstract neighbor-lookup capability.
//!
//! Every traversal algorithm in this crate is written once against
//! [`GraphSource`], so the same code runs over the fully resident graph
//! (lookups resolve immediately) and over a remote store where every lookup
//! is a network round trip. Callers of the remote shape cancel an in-flight
//! traversal cooperatively by dropping its future; each lookup is a
//! suspension point.

use crate::adjacency::AdjacencyEntry;
use crate::graph::KnowledgeGraph;
use crate::relation::{GraphEdge, RelationKind};
use async_trait::async_trait;
use silsila_core::{Entity, GraphError};
use std::collections::HashSet;
use std::sync::Arc;

/// Read access to one immutable graph snapshot.
///
/// Contract: `entity` answers existence; `neighbors` of an unknown id is an
/// empty vec, not an error. A lookup failure (remote shape) is returned to
/// the caller, never swallowed into a truncated result.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetches an entity by id.
    async fn entity(&self, id: &str) -> Result<Option<Entity>, GraphError>;

    /// Fetches the ordered adjacency entries recorded under an entity.
    async fn neighbors(&self, id: &str) -> Result<Vec<AdjacencyEntry>, GraphError>;

    /// Fetches the entities carrying a theme tag, in insertion order.
    async fn entities_by_theme(&self, tag: &str) -> Result<Vec<Entity>, GraphError>;
}

#[async_trait]
impl<T: GraphSource + ?Sized> GraphSource for &T {
    async fn entity(&self, id: &str) -> Result<Option<Entity>, GraphError> {
        (**self).entity(id).await
    }

    async fn neighbors(&self, id: &str) -> Result<Vec<AdjacencyEntry>, GraphError> {
        (**self).neighbors(id).await
    }

    async fn entities_by_theme(&self, tag: &str) -> Result<Vec<Entity>, GraphError> {
        (**self).entities_by_theme(tag).await
    }
}

/// The in-process adapter: wraps one immutable snapshot behind an `Arc`.
///
/// Lookups never block and never fail; the async surface exists only so the
/// algorithms stay backing-agnostic.
#[derive(Clone)]
pub struct MemoryGraph {
    graph: Arc<KnowledgeGraph>,
}

impl MemoryGraph {
    pub fn new(graph: Arc<KnowledgeGraph>) -> Self {
        Self { graph }
    }

    /// The wrapped snapshot.
    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }
}

#[async_trait]
impl GraphSource for MemoryGraph {
    async fn entity(&self, id: &str) -> Result<Option<Entity>, GraphError> {
        Ok(self.graph.entity(id).cloned())
    }

    async fn neighbors(&self, id: &str) -> Result<Vec<AdjacencyEntry>, GraphError> {
        Ok(self.graph.neighbors(id).to_vec())
    }

    async fn entities_by_theme(&self, tag: &str) -> Result<Vec<Entity>, GraphError> {
        Ok(self
            .graph
            .entities_by_theme(tag)
            .into_iter()
            .cloned()
            .collect())
    }
}

/// Errors with `NodeNotFound` unless the id names an entity.
pub(crate) async fn require_entity<S: GraphSource>(
    source: &S,
    id: &str,
) -> Result<Entity, GraphError> {
    source
        .entity(id)
        .await?
        .ok_or_else(|| GraphError::node_not_found(id))
}

/// Collects every edge whose both endpoints lie inside `ids`, applying the
/// kind filter and deduplicating bidirectional entries by relationship id.
/// `order` fixes the iteration (and therefore output) order.
pub(crate) async fn edges_within<S: GraphSource>(
    source: &S,
    order: &[String],
    ids: &HashSet<String>,
    filter: Option<&[RelationKind]>,
) -> Result<Vec<GraphEdge>, GraphError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut edges = Vec::new();

    for id in order {
        for entry in source.neighbors(id).await? {
            if !entry.permitted(filter) || !ids.contains(&entry.neighbor) {
                continue;
            }
            if seen.insert(entry.relationship.clone()) {
                edges.push(entry.to_edge(id));
            }
        }
    }

    Ok(edges)
}
