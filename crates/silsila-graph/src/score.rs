//! Composite relationship-strength scoring between two entities.
//!
//! Blends three signals: the weight of a direct edge, the number of shared
//! neighbors, and the shortest-path distance. Each signal is normalized
//! into [0, 1] and the blend is a fixed-weight sum, so the composite is
//! always in [0, 1] and absent signals simply contribute nothing.

use crate::path::PathFinder;
use crate::relation::RelationKind;
use crate::source::{require_entity, GraphSource};
use serde::{Deserialize, Serialize};
use silsila_core::GraphError;
use std::collections::HashSet;

/// Direct-edge weights at or above this value normalize to 1.0.
const DIRECT_WEIGHT_CAP: f64 = 5.0;

/// Shared-neighbor counts at or above this value normalize to 1.0.
const SHARED_NEIGHBOR_CAP: usize = 10;

/// Depth bound used for the path-distance signal.
const SCORE_PATH_DEPTH: usize = 6;

/// Blend weights for the three signals.
const DIRECT_FACTOR: f64 = 0.5;
const SHARED_FACTOR: f64 = 0.3;
const DISTANCE_FACTOR: f64 = 0.2;

/// The strength record between two entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthScore {
    /// Weight of a direct edge in either direction, if one exists. When
    /// several qualify, the strongest is reported.
    pub direct_weight: Option<f64>,

    /// Size of the intersection of the two neighbor sets (uncapped).
    pub shared_neighbors: usize,

    /// Hop count of the shortest path, if one exists within the scoring
    /// depth bound.
    pub path_length: Option<usize>,

    /// Blended score, always in [0, 1].
    pub composite: f64,
}

/// Scores entity pairs over any [`GraphSource`].
pub struct StrengthScorer<S> {
    source: S,
}

impl<S: GraphSource> StrengthScorer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Computes the composite strength between `a` and `b`.
    ///
    /// `composite = 0.5·norm(direct) + 0.3·norm(shared) + 0.2·(1/(1+len))`,
    /// where a missing signal contributes zero.
    pub async fn score(&self, a: &str, b: &str) -> Result<StrengthScore, GraphError> {
        require_entity(&self.source, a).await?;
        require_entity(&self.source, b).await?;

        let a_entries = self.source.neighbors(a).await?;
        let b_entries = self.source.neighbors(b).await?;

        // Direct edge in either direction: a's entries reach b, or b's
        // entries reach a (covers one-way edges b → a).
        let direct_weight = a_entries
            .iter()
            .filter(|e| e.neighbor == b)
            .chain(b_entries.iter().filter(|e| e.neighbor == a))
            .map(|e| e.weight)
            .fold(None, |best: Option<f64>, w| {
                Some(best.map_or(w, |strongest| strongest.max(w)))
            });

        let a_neighbors: HashSet<&str> = a_entries.iter().map(|e| e.neighbor.as_str()).collect();
        let b_neighbors: HashSet<&str> = b_entries.iter().map(|e| e.neighbor.as_str()).collect();
        let shared_neighbors = a_neighbors.intersection(&b_neighbors).count();

        let path_length = PathFinder::new(&self.source)
            .shortest_path(a, b, None, SCORE_PATH_DEPTH)
            .await?
            .map(|p| p.len());

        let direct_term = direct_weight
            .map(|w| w.min(DIRECT_WEIGHT_CAP) / DIRECT_WEIGHT_CAP)
            .unwrap_or(0.0);
        let shared_term = shared_neighbors.min(SHARED_NEIGHBOR_CAP) as f64 / SHARED_NEIGHBOR_CAP as f64;
        let distance_term = path_length
            .map(|len| 1.0 / (1.0 + len as f64))
            .unwrap_or(0.0);

        let composite = DIRECT_FACTOR * direct_term
            + SHARED_FACTOR * shared_term
            + DISTANCE_FACTOR * distance_term;

        Ok(StrengthScore {
            direct_weight,
            shared_neighbors,
            path_length,
            composite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::relation::Relationship;
    use crate::source::MemoryGraph;
    use silsila_core::{Entity, EntityKind};
    use std::sync::Arc;

    fn entity(id: &str) -> Entity {
        Entity::new(id, id, EntityKind::Person)
    }

    /// Reference scenario: A→B (w2), B↔C (w1), C→D (w1).
    fn chain_graph() -> MemoryGraph {
        let mut builder = GraphBuilder::new();
        for id in ["a", "b", "c", "d"] {
            builder.add_entity(entity(id));
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
    async fn test_score_distance_only() {
        // No direct edge, no shared neighbor, path length 3:
        // composite = 0.2 · 1/4 = 0.05 exactly.
        let scorer = StrengthScorer::new(chain_graph());
        let score = scorer.score("a", "d").await.unwrap();

        assert_eq!(score.direct_weight, None);
        assert_eq!(score.shared_neighbors, 0);
        assert_eq!(score.path_length, Some(3));
        assert!((score.composite - 0.05).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_score_direct_edge() {
        let scorer = StrengthScorer::new(chain_graph());
        let score = scorer.score("a", "b").await.unwrap();

        assert_eq!(score.direct_weight, Some(2.0));
        assert_eq!(score.path_length, Some(1));
        // 0.5·(2/5) + 0.2·(1/2) = 0.3
        assert!((score.composite - 0.3).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_score_direct_edge_reverse_direction() {
        // Only edge is a → b; scoring (b, a) still sees it.
        let scorer = StrengthScorer::new(chain_graph());
        let score = scorer.score("b", "a").await.unwrap();
        assert_eq!(score.direct_weight, Some(2.0));
    }

    #[tokio::test]
    async fn test_score_shared_neighbors() {
        // a → c and b → c: c is a shared neighbor of (a, b).
        let mut builder = GraphBuilder::new();
        for id in ["a", "b", "c"] {
            builder.add_entity(entity(id));
        }
        builder.add_relationship(Relationship::new("r1", "a", "c", RelationKind::ContemporaryOf));
        builder.add_relationship(Relationship::new("r2", "b", "c", RelationKind::ContemporaryOf));
        let scorer = StrengthScorer::new(MemoryGraph::new(Arc::new(builder.build().unwrap())));

        let score = scorer.score("a", "b").await.unwrap();
        assert_eq!(score.shared_neighbors, 1);
        assert_eq!(score.direct_weight, None);
        assert_eq!(score.path_length, None);
        // 0.3 · 1/10
        assert!((score.composite - 0.03).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_composite_stays_in_unit_interval() {
        // Saturate every signal: huge direct weight, many shared neighbors.
        let mut builder = GraphBuilder::new();
        builder.add_entity(entity("a"));
        builder.add_entity(entity("b"));
        for i in 0..12 {
            builder.add_entity(entity(&format!("n{i}")));
        }
        builder.add_relationship(
            Relationship::new("direct", "a", "b", RelationKind::ContemporaryOf).with_weight(100.0),
        );
        for i in 0..12 {
            builder.add_relationship(Relationship::new(
                format!("ra{i}"),
                "a",
                format!("n{i}"),
                RelationKind::ContemporaryOf,
            ));
            builder.add_relationship(Relationship::new(
                format!("rb{i}"),
                "b",
                format!("n{i}"),
                RelationKind::ContemporaryOf,
            ));
        }
        let scorer = StrengthScorer::new(MemoryGraph::new(Arc::new(builder.build().unwrap())));

        let score = scorer.score("a", "b").await.unwrap();
        assert_eq!(score.shared_neighbors, 12);
        assert!(score.composite <= 1.0);
        // All three terms saturated: 0.5 + 0.3 + 0.2·(1/2)
        assert!((score.composite - 0.9).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_score_missing_entity() {
        let scorer = StrengthScorer::new(chain_graph());
        assert!(matches!(
            scorer.score("a", "zz").await,
            Err(GraphError::NodeNotFound { .. })
        ));
    }
}
