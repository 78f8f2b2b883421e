//! Graph builder: the single validated path from records to a graph.
//!
//! The builder collects entities and relationships in bulk, then `build`
//! validates everything at once and derives the adjacency and theme indexes.
//! Validation is fail-fast: the first malformed reference aborts the whole
//! build, so a successfully built graph never contains a dangling endpoint.

use crate::adjacency::AdjacencyIndex;
use crate::graph::KnowledgeGraph;
use crate::relation::Relationship;
use petgraph::graph::{DiGraph, NodeIndex};
use silsila_core::{Entity, EntityRecord, GraphError, RelationshipRecord};
use std::collections::HashMap;
use tracing::{debug, info};

/// Builds a [`KnowledgeGraph`] from bulk-loaded entities and relationships.
#[derive(Default)]
pub struct GraphBuilder {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
}

impl GraphBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a typed entity.
    pub fn add_entity(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    /// Adds a typed relationship.
    pub fn add_relationship(&mut self, relationship: Relationship) -> &mut Self {
        self.relationships.push(relationship);
        self
    }

    /// Adds raw records as delivered by the content store. Kind strings are
    /// parsed here, once; invalid weights fail immediately.
    pub fn add_records(
        &mut self,
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
    ) -> Result<&mut Self, GraphError> {
        self.entities
            .extend(entities.into_iter().map(EntityRecord::into_entity));
        for record in relationships {
            self.relationships.push(Relationship::from_record(record)?);
        }
        Ok(self)
    }

    /// Validates the collected data and builds the immutable graph.
    ///
    /// Fails with `DuplicateEntity` on a repeated id, `UnknownEndpoint` on a
    /// relationship referencing a missing entity, and `InvalidWeight` on a
    /// non-positive or non-finite weight.
    pub fn build(self) -> Result<KnowledgeGraph, GraphError> {
        let mut graph: DiGraph<Entity, Relationship> = DiGraph::new();
        let mut id_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut theme_index: HashMap<String, Vec<NodeIndex>> = HashMap::new();

        for entity in self.entities {
            if id_index.contains_key(&entity.id) {
                return Err(GraphError::DuplicateEntity { id: entity.id });
            }

            let id = entity.id.clone();
            let themes: Vec<String> = entity.themes.iter().cloned().collect();
            let index = graph.add_node(entity);

            id_index.insert(id, index);
            for theme in themes {
                theme_index.entry(theme).or_default().push(index);
            }
        }

        for rel in &self.relationships {
            if !(rel.weight.is_finite() && rel.weight > 0.0) {
                return Err(GraphError::InvalidWeight {
                    relationship: rel.id.clone(),
                    weight: rel.weight,
                });
            }
            for endpoint in [&rel.source, &rel.target] {
                if !id_index.contains_key(endpoint) {
                    return Err(GraphError::UnknownEndpoint {
                        relationship: rel.id.clone(),
                        entity: endpoint.clone(),
                    });
                }
            }
        }

        // Adjacency entries follow relationship insertion order; the arena
        // edges are added in the same order for consistent export.
        let adjacency = AdjacencyIndex::build(&self.relationships);
        debug!(indexed = adjacency.len(), "adjacency index built");

        let relationship_count = self.relationships.len();
        for rel in self.relationships {
            let from = id_index[&rel.source];
            let to = id_index[&rel.target];
            graph.add_edge(from, to, rel);
        }

        info!(
            entities = graph.node_count(),
            relationships = relationship_count,
            "knowledge graph built"
        );

        Ok(KnowledgeGraph {
            graph,
            id_index,
            theme_index,
            adjacency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;
    use silsila_core::EntityKind;

    fn entity(id: &str) -> Entity {
        Entity::new(id, id, EntityKind::Concept)
    }

    #[test]
    fn test_build_empty() {
        let graph = GraphBuilder::new().build().unwrap();
        assert_eq!(graph.entity_count(), 0);
    }

    #[test]
    fn test_build_links_endpoints() {
        let mut builder = GraphBuilder::new();
        builder.add_entity(entity("a"));
        builder.add_entity(entity("b"));
        builder.add_relationship(Relationship::new("r1", "a", "b", RelationKind::ThemeOf));

        let graph = builder.build().unwrap();
        assert_eq!(graph.relationship_count(), 1);
        assert_eq!(graph.neighbors("a")[0].neighbor, "b");
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_entity(entity("a"));
        builder.add_entity(entity("a"));

        match builder.build() {
            Err(GraphError::DuplicateEntity { id }) => assert_eq!(id, "a"),
            other => panic!("expected DuplicateEntity, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_endpoint_fails_build() {
        let mut builder = GraphBuilder::new();
        builder.add_entity(entity("a"));
        builder.add_relationship(Relationship::new("r1", "a", "missing", RelationKind::ThemeOf));

        match builder.build() {
            Err(GraphError::UnknownEndpoint { relationship, entity }) => {
                assert_eq!(relationship, "r1");
                assert_eq!(entity, "missing");
            }
            other => panic!("expected UnknownEndpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_weight_fails_build() {
        let mut builder = GraphBuilder::new();
        builder.add_entity(entity("a"));
        builder.add_entity(entity("b"));
        builder.add_relationship(
            Relationship::new("r1", "a", "b", RelationKind::ThemeOf).with_weight(-2.0),
        );

        assert!(matches!(
            builder.build(),
            Err(GraphError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_add_records_parses_kinds_once() {
        use silsila_core::{EntityRecord, RelationshipRecord};
        use std::collections::{BTreeMap, BTreeSet};

        let entities = vec![
            EntityRecord {
                id: "a".into(),
                kind: "person".into(),
                label: "A".into(),
                alt_labels: BTreeMap::new(),
                attributes: BTreeMap::new(),
                citations: BTreeSet::new(),
                themes: BTreeSet::new(),
            },
            EntityRecord {
                id: "b".into(),
                kind: "mystery".into(),
                label: "B".into(),
                alt_labels: BTreeMap::new(),
                attributes: BTreeMap::new(),
                citations: BTreeSet::new(),
                themes: BTreeSet::new(),
            },
        ];
        let relationships = vec![RelationshipRecord {
            id: "r1".into(),
            source_id: "a".into(),
            target_id: "b".into(),
            kind: "lived_in".into(),
            description: None,
            weight: None,
            bidirectional: true,
        }];

        let mut builder = GraphBuilder::new();
        builder.add_records(entities, relationships).unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.entity("a").unwrap().kind, EntityKind::Person);
        assert_eq!(graph.entity("b").unwrap().kind, EntityKind::Unknown);
        // Bidirectional record indexed under both endpoints.
        assert_eq!(graph.neighbors("b")[0].neighbor, "a");
    }
}
