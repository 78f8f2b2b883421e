//! Induced subgraph extraction over an explicit node set.

use crate::relation::{GraphEdge, RelationKind};
use crate::source::{edges_within, require_entity, GraphSource};
use serde::{Deserialize, Serialize};
use silsila_core::{Entity, GraphError};
use std::collections::HashSet;

/// The induced subgraph: exactly the requested nodes, and (optionally) the
/// edges between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<Entity>,
    pub edges: Vec<GraphEdge>,
}

/// Extracts induced subgraphs over any [`GraphSource`].
pub struct SubgraphExtractor<S> {
    source: S,
}

impl<S: GraphSource> SubgraphExtractor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the requested nodes (first occurrence order, duplicates
    /// dropped) and, when `include_edges` is set, every relationship whose
    /// **both** endpoints are in the set. An edge with an endpoint outside
    /// the set is never returned. Any id absent from the graph is a hard
    /// `NodeNotFound` error.
    pub async fn extract(
        &self,
        node_ids: &[String],
        filter: Option<&[RelationKind]>,
        include_edges: bool,
    ) -> Result<Subgraph, GraphError> {
        let mut order: Vec<String> = Vec::new();
        let mut ids: HashSet<String> = HashSet::new();
        let mut nodes = Vec::new();

        for id in node_ids {
            if !ids.insert(id.clone()) {
                continue;
            }
            order.push(id.clone());
            nodes.push(require_entity(&self.source, id).await?);
        }

        let edges = if include_edges {
            edges_within(&self.source, &order, &ids, filter).await?
        } else {
            Vec::new()
        };

        Ok(Subgraph { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::relation::Relationship;
    use crate::source::MemoryGraph;
    use silsila_core::EntityKind;
    use std::sync::Arc;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    /// Reference scenario: A→B, B↔C, C→D.
    fn chain_graph() -> MemoryGraph {
        let mut builder = GraphBuilder::new();
        for id in ["a", "b", "c", "d"] {
            builder.add_entity(Entity::new(id, id, EntityKind::Person));
        }
        builder.add_relationship(
            Relationship::new("r1", "a", "b", RelationKind::ContemporaryOf).with_weight(2.0),
        );
        builder.add_relationship(
            Relationship::new("r2", "b", "c", RelationKind::ContemporaryOf).bidirectional(),
        );
        builder.add_relationship(Relationship::new("r3", "c", "d", RelationKind::ContemporaryOf));
        MemoryGraph::new(Arc::new(builder.build().unwrap()))
    }

    #[tokio::test]
    async fn test_extract_induced_edges_only() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let subgraph = extractor.extract(&ids(&["a", "b", "c"]), None, true).await.unwrap();

        assert_eq!(subgraph.nodes.len(), 3);
        let rels: Vec<&str> = subgraph.edges.iter().map(|e| e.relationship.as_str()).collect();
        // r3 has endpoint d, outside the set.
        assert_eq!(rels, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_extract_bidirectional_counted_once() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let subgraph = extractor.extract(&ids(&["b", "c"]), None, true).await.unwrap();

        assert_eq!(subgraph.edges.len(), 1);
        assert_eq!(subgraph.edges[0].source, "b");
        assert_eq!(subgraph.edges[0].target, "c");
    }

    #[tokio::test]
    async fn test_extract_without_edges() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let subgraph = extractor.extract(&ids(&["a", "d"]), None, false).await.unwrap();

        assert_eq!(subgraph.nodes.len(), 2);
        assert!(subgraph.edges.is_empty());
    }

    #[tokio::test]
    async fn test_extract_deduplicates_request() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let subgraph = extractor.extract(&ids(&["a", "a", "b"]), None, false).await.unwrap();
        assert_eq!(subgraph.nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_unknown_id_is_error() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let err = extractor.extract(&ids(&["a", "zz"]), None, true).await.unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
    }

    #[tokio::test]
    async fn test_extract_kind_filter() {
        let extractor = SubgraphExtractor::new(chain_graph());
        let filter = [RelationKind::LivedIn];
        let subgraph = extractor
            .extract(&ids(&["a", "b", "c"]), Some(&filter), true)
            .await
            .unwrap();
        assert!(subgraph.edges.is_empty());
    }
}
