//! Core graph data structure.
//!
//! The KnowledgeGraph wraps petgraph and adds indexes for fast lookups.
//! Once built it is immutable: queries share one snapshot with no locking,
//! and a content change replaces the whole snapshot instead of editing it
//! in place.

use crate::adjacency::{AdjacencyEntry, AdjacencyIndex};
use crate::relation::Relationship;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use silsila_core::Entity;
use std::collections::HashMap;

/// The knowledge graph: entities as nodes, relationships as edges.
///
/// Entities and relationships live in a flat, id-addressed arena, so cyclic
/// references (person → place → person) are ordinary data and concurrent
/// read access needs no synchronization.
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    /// The underlying petgraph arena.
    pub(crate) graph: DiGraph<Entity, Relationship>,

    /// Maps entity ids to graph node indexes.
    pub(crate) id_index: HashMap<String, NodeIndex>,

    /// Maps theme tags to entities, in entity insertion order.
    pub(crate) theme_index: HashMap<String, Vec<NodeIndex>>,

    /// Precomputed neighbor lookup; owns traversal order.
    pub(crate) adjacency: AdjacencyIndex,
}

impl KnowledgeGraph {
    /// Gets an entity by id.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Returns true if the id names an entity in this graph.
    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Returns the ordered adjacency entries for an entity. Unknown ids
    /// yield an empty slice.
    pub fn neighbors(&self, id: &str) -> &[AdjacencyEntry] {
        self.adjacency.neighbors(id)
    }

    /// Returns the entities carrying a theme tag, in insertion order.
    pub fn entities_by_theme(&self, tag: &str) -> Vec<&Entity> {
        self.theme_index
            .get(tag)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|idx| self.graph.node_weight(*idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterates over all entities.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_weights()
    }

    /// Iterates over all relationships.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.graph.edge_weights()
    }

    /// Returns the number of entities.
    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            entity_count: self.entity_count(),
            relationship_count: self.relationship_count(),
            theme_count: self.theme_index.len(),
        }
    }
}

/// Graph statistics for the info surfaces.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphStats {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub theme_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::relation::{RelationKind, Relationship};
    use silsila_core::EntityKind;

    fn sample_graph() -> KnowledgeGraph {
        let mut builder = GraphBuilder::new();
        builder.add_entity(
            Entity::new("person:ayyub", "Ayyub", EntityKind::Person).with_themes(["patience"]),
        );
        builder.add_entity(
            Entity::new("concept:sabr", "Patience", EntityKind::Concept).with_themes(["patience"]),
        );
        builder.add_relationship(Relationship::new(
            "rel:1",
            "concept:sabr",
            "person:ayyub",
            RelationKind::ThemeOf,
        ));
        builder.build().unwrap()
    }

    #[test]
    fn test_entity_lookup() {
        let graph = sample_graph();
        assert!(graph.contains("person:ayyub"));
        assert!(!graph.contains("person:unknown"));
        assert_eq!(graph.entity("person:ayyub").unwrap().label, "Ayyub");
    }

    #[test]
    fn test_theme_index() {
        let graph = sample_graph();
        let entities = graph.entities_by_theme("patience");
        assert_eq!(entities.len(), 2);
        assert!(graph.entities_by_theme("gratitude").is_empty());
    }

    #[test]
    fn test_stats() {
        let graph = sample_graph();
        let stats = graph.stats();
        assert_eq!(stats.entity_count, 2);
        assert_eq!(stats.relationship_count, 1);
        assert_eq!(stats.theme_count, 1);
    }
}
