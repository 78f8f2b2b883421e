//! Precomputed adjacency index.
//!
//! Built once per graph build, the index maps every entity id to the ordered
//! list of its directly reachable neighbors. Traversal determinism is owned
//! here: entries appear in relationship insertion order, so breadth-first
//! tie-breaking and path enumeration are stable across runs.

use crate::relation::{GraphEdge, RelationKind, Relationship};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One hop recorded under an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    /// Id of the entity reachable through this hop.
    pub neighbor: String,

    /// Id of the relationship that created the hop.
    pub relationship: String,

    pub kind: RelationKind,

    pub weight: f64,

    /// True for the reverse entry of a bidirectional relationship: the
    /// indexed entity is the relationship's *target*. Keeps the true
    /// source/target recoverable from any entry.
    pub reversed: bool,
}

impl AdjacencyEntry {
    /// Returns true if this hop may be traversed under the given filter.
    pub fn permitted(&self, filter: Option<&[RelationKind]>) -> bool {
        match filter {
            Some(kinds) => kinds.contains(&self.kind),
            None => true,
        }
    }

    /// Reconstructs the source → target edge descriptor, given the id of
    /// the entity this entry was indexed under.
    pub fn to_edge(&self, indexed_under: &str) -> GraphEdge {
        let (source, target) = if self.reversed {
            (self.neighbor.clone(), indexed_under.to_string())
        } else {
            (indexed_under.to_string(), self.neighbor.clone())
        };
        GraphEdge {
            relationship: self.relationship.clone(),
            source,
            target,
            kind: self.kind,
            weight: self.weight,
        }
    }
}

/// Entity id → ordered neighbor entries.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdjacencyIndex {
    entries: HashMap<String, Vec<AdjacencyEntry>>,
}

impl AdjacencyIndex {
    /// Builds the index from the full relationship set.
    ///
    /// Each relationship appends an entry under its source; a bidirectional
    /// relationship also appends the reverse entry under its target.
    /// Endpoint validation happens in the builder before this runs.
    pub fn build<'a>(relationships: impl IntoIterator<Item = &'a Relationship>) -> Self {
        let mut entries: HashMap<String, Vec<AdjacencyEntry>> = HashMap::new();

        for rel in relationships {
            entries
                .entry(rel.source.clone())
                .or_default()
                .push(AdjacencyEntry {
                    neighbor: rel.target.clone(),
                    relationship: rel.id.clone(),
                    kind: rel.kind,
                    weight: rel.weight,
                    reversed: false,
                });

            if rel.bidirectional {
                entries
                    .entry(rel.target.clone())
                    .or_default()
                    .push(AdjacencyEntry {
                        neighbor: rel.source.clone(),
                        relationship: rel.id.clone(),
                        kind: rel.kind,
                        weight: rel.weight,
                        reversed: true,
                    });
            }
        }

        Self { entries }
    }

    /// Returns the ordered entries recorded under an entity. Unknown ids
    /// yield an empty slice.
    pub fn neighbors(&self, id: &str) -> &[AdjacencyEntry] {
        self.entries.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entities with at least one recorded hop.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;

    fn rel(id: &str, source: &str, target: &str) -> Relationship {
        Relationship::new(id, source, target, RelationKind::ContemporaryOf)
    }

    #[test]
    fn test_one_way_indexed_under_source_only() {
        let rels = vec![rel("r1", "a", "b")];
        let index = AdjacencyIndex::build(&rels);

        assert_eq!(index.neighbors("a").len(), 1);
        assert_eq!(index.neighbors("a")[0].neighbor, "b");
        assert!(index.neighbors("b").is_empty());
    }

    #[test]
    fn test_bidirectional_indexed_under_both() {
        let rels = vec![rel("r1", "a", "b").bidirectional()];
        let index = AdjacencyIndex::build(&rels);

        assert_eq!(index.neighbors("a")[0].neighbor, "b");
        assert!(!index.neighbors("a")[0].reversed);
        assert_eq!(index.neighbors("b")[0].neighbor, "a");
        assert!(index.neighbors("b")[0].reversed);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let rels = vec![rel("r1", "a", "z"), rel("r2", "a", "m"), rel("r3", "a", "b")];
        let index = AdjacencyIndex::build(&rels);

        let neighbors: Vec<&str> = index
            .neighbors("a")
            .iter()
            .map(|e| e.neighbor.as_str())
            .collect();
        assert_eq!(neighbors, vec!["z", "m", "b"]);
    }

    #[test]
    fn test_reverse_entry_recovers_true_orientation() {
        let rels = vec![rel("r1", "a", "b").bidirectional()];
        let index = AdjacencyIndex::build(&rels);

        let edge = index.neighbors("b")[0].to_edge("b");
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
    }

    #[test]
    fn test_filter() {
        let entry = AdjacencyEntry {
            neighbor: "b".to_string(),
            relationship: "r1".to_string(),
            kind: RelationKind::LivedIn,
            weight: 1.0,
            reversed: false,
        };

        assert!(entry.permitted(None));
        assert!(entry.permitted(Some(&[RelationKind::LivedIn])));
        assert!(!entry.permitted(Some(&[RelationKind::ThemeOf])));
    }
}
