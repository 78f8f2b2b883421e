//! Bounded neighborhood exploration around a seed entity.
//!
//! Breadth-first expansion recording the discovery depth of every node,
//! used to seed visualizations and subgraph views.

use crate::relation::{GraphEdge, RelationKind};
use crate::source::{edges_within, require_entity, GraphSource};
use serde::{Deserialize, Serialize};
use silsila_core::{Entity, GraphError};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// A node discovered during exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredNode {
    pub entity: Entity,

    /// Hop distance from the seed at first discovery.
    pub depth: usize,
}

/// The explored region: discovered nodes plus every edge connecting two of
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub nodes: Vec<DiscoveredNode>,
    pub edges: Vec<GraphEdge>,
}

/// Breadth-first explorer over any [`GraphSource`].
pub struct NeighborhoodExplorer<S> {
    source: S,
}

impl<S: GraphSource> NeighborhoodExplorer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Expands outward from `seed` up to `depth` hops, stopping hard once
    /// `max_nodes` distinct nodes have been discovered.
    ///
    /// The cutoff is deliberate: a frontier level in progress when the cap
    /// is hit is *not* completed, which keeps the result size bounded and
    /// the behavior easy to test. Nodes are returned in discovery order
    /// with their depth; edges cover every pair of discovered nodes.
    pub async fn explore(
        &self,
        seed: &str,
        depth: usize,
        filter: Option<&[RelationKind]>,
        max_nodes: usize,
    ) -> Result<Neighborhood, GraphError> {
        if depth == 0 {
            return Err(GraphError::InvalidBound {
                what: "depth",
                value: depth,
            });
        }
        if max_nodes == 0 {
            return Err(GraphError::InvalidBound {
                what: "max_nodes",
                value: max_nodes,
            });
        }
        require_entity(&self.source, seed).await?;

        let mut discovered: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        discovered.insert(seed.to_string(), 0);
        order.push(seed.to_string());
        queue.push_back((seed.to_string(), 0));

        'expansion: while let Some((current, current_depth)) = queue.pop_front() {
            if current_depth == depth {
                continue;
            }

            for entry in self.source.neighbors(&current).await? {
                if !entry.permitted(filter) || discovered.contains_key(&entry.neighbor) {
                    continue;
                }
                if discovered.len() == max_nodes {
                    debug!(seed, max_nodes, "node cap hit, expansion cut off");
                    break 'expansion;
                }

                discovered.insert(entry.neighbor.clone(), current_depth + 1);
                order.push(entry.neighbor.clone());
                queue.push_back((entry.neighbor, current_depth + 1));
            }
        }

        let ids: HashSet<String> = discovered.keys().cloned().collect();
        let edges = edges_within(&self.source, &order, &ids, filter).await?;

        let mut nodes = Vec::with_capacity(order.len());
        for id in &order {
            let entity = require_entity(&self.source, id).await?;
            nodes.push(DiscoveredNode {
                entity,
                depth: discovered[id],
            });
        }

        Ok(Neighborhood { nodes, edges })
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

    fn star_graph() -> MemoryGraph {
        // hub → s1, s2, s3; s1 → t1; t1 → u1.
        let mut builder = GraphBuilder::new();
        for id in ["hub", "s1", "s2", "s3", "t1", "u1"] {
            builder.add_entity(Entity::new(id, id, EntityKind::Person));
        }
        builder.add_relationship(Relationship::new("r1", "hub", "s1", RelationKind::TeacherOf));
        builder.add_relationship(Relationship::new("r2", "hub", "s2", RelationKind::TeacherOf));
        builder.add_relationship(Relationship::new("r3", "hub", "s3", RelationKind::TeacherOf));
        builder.add_relationship(Relationship::new("r4", "s1", "t1", RelationKind::TeacherOf));
        builder.add_relationship(Relationship::new("r5", "t1", "u1", RelationKind::TeacherOf));
        MemoryGraph::new(Arc::new(builder.build().unwrap()))
    }

    #[tokio::test]
    async fn test_explore_records_depths() {
        let explorer = NeighborhoodExplorer::new(star_graph());
        let region = explorer.explore("hub", 2, None, 50).await.unwrap();

        let depth_of = |id: &str| {
            region
                .nodes
                .iter()
                .find(|n| n.entity.id == id)
                .map(|n| n.depth)
        };
        assert_eq!(depth_of("hub"), Some(0));
        assert_eq!(depth_of("s2"), Some(1));
        assert_eq!(depth_of("t1"), Some(2));
        // u1 is 3 hops out; beyond the depth bound.
        assert_eq!(depth_of("u1"), None);
    }

    #[tokio::test]
    async fn test_explore_edges_connect_discovered_only() {
        let explorer = NeighborhoodExplorer::new(star_graph());
        let region = explorer.explore("hub", 2, None, 50).await.unwrap();

        // r5 leads to u1, which was not discovered.
        assert!(region.edges.iter().all(|e| e.relationship != "r5"));
        assert_eq!(region.edges.len(), 4);
    }

    #[tokio::test]
    async fn test_explore_hard_node_cap() {
        let explorer = NeighborhoodExplorer::new(star_graph());
        let region = explorer.explore("hub", 2, None, 3).await.unwrap();

        // Seed plus the first two spokes; the frontier level is abandoned
        // mid-flight rather than completed.
        assert_eq!(region.nodes.len(), 3);
        let ids: Vec<&str> = region.nodes.iter().map(|n| n.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["hub", "s1", "s2"]);
    }

    #[tokio::test]
    async fn test_explore_missing_seed() {
        let explorer = NeighborhoodExplorer::new(star_graph());
        let err = explorer.explore("nope", 2, None, 10).await.unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
    }

    #[tokio::test]
    async fn test_explore_zero_bounds_rejected() {
        let explorer = NeighborhoodExplorer::new(star_graph());
        assert!(explorer.explore("hub", 0, None, 10).await.is_err());
        assert!(explorer.explore("hub", 2, None, 0).await.is_err());
    }
}
