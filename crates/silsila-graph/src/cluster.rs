//! Thematic clustering: group entities by shared theme tag and link them
//! via short paths, forming a subgraph for exploration.

use crate::path::{Path, PathFinder};
use crate::source::GraphSource;
use serde::{Deserialize, Serialize};
use silsila_core::{Entity, GraphError};
use tracing::debug;

/// Two clustered entities count as linked when a path of at most this many
/// hops connects them.
pub const CONNECT_MAX_HOPS: usize = 2;

/// A linked pair inside a thematic cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThematicLink {
    pub a: String,
    pub b: String,
    pub path: Path,
}

/// Groups and links entities by theme over any [`GraphSource`].
pub struct ThematicClusterer<S> {
    source: S,
}

impl<S: GraphSource> ThematicClusterer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the entities whose theme tags contain `tag`, in insertion
    /// order. An unknown tag yields an empty cluster, not an error.
    pub async fn cluster_by_tag(&self, tag: &str) -> Result<Vec<Entity>, GraphError> {
        self.source.entities_by_theme(tag).await
    }

    /// Links the given entities pairwise: a pair is linked when a path of
    /// at most [`CONNECT_MAX_HOPS`] hops exists between them. Pairs are
    /// checked in input order (each unordered pair once).
    pub async fn connect(&self, ids: &[String]) -> Result<Vec<ThematicLink>, GraphError> {
        let finder = PathFinder::new(&self.source);
        let mut links = Vec::new();

        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if a == b {
                    continue;
                }
                if let Some(path) = finder.shortest_path(a, b, None, CONNECT_MAX_HOPS).await? {
                    links.push(ThematicLink {
                        a: a.clone(),
                        b: b.clone(),
                        path,
                    });
                }
            }
        }

        debug!(entities = ids.len(), links = links.len(), "thematic links computed");
        Ok(links)
    }

    /// Convenience: cluster by tag, then link the cluster members.
    pub async fn thematic_subgraph(
        &self,
        tag: &str,
    ) -> Result<(Vec<Entity>, Vec<ThematicLink>), GraphError> {
        let entities = self.cluster_by_tag(tag).await?;
        let ids: Vec<String> = entities.iter().map(|e| e.id.clone()).collect();
        let links = self.connect(&ids).await?;
        Ok((entities, links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::relation::{RelationKind, Relationship};
    use crate::source::MemoryGraph;
    use silsila_core::EntityKind;
    use std::sync::Arc;

    fn themed(id: &str, themes: &[&str]) -> Entity {
        Entity::new(id, id, EntityKind::Person).with_themes(themes.iter().copied())
    }

    fn patience_graph() -> MemoryGraph {
        // ayyub and yaqub share the "patience" theme and sit two hops
        // apart; yunus carries the theme but is disconnected.
        let mut builder = GraphBuilder::new();
        builder.add_entity(themed("ayyub", &["patience"]));
        builder.add_entity(themed("yaqub", &["patience"]));
        builder.add_entity(themed("yunus", &["patience"]));
        builder.add_entity(themed("trials", &[]));
        builder.add_relationship(
            Relationship::new("r1", "ayyub", "trials", RelationKind::ParticipantIn)
                .bidirectional(),
        );
        builder.add_relationship(
            Relationship::new("r2", "yaqub", "trials", RelationKind::ParticipantIn)
                .bidirectional(),
        );
        MemoryGraph::new(Arc::new(builder.build().unwrap()))
    }

    #[tokio::test]
    async fn test_cluster_by_tag() {
        let clusterer = ThematicClusterer::new(patience_graph());
        let cluster = clusterer.cluster_by_tag("patience").await.unwrap();

        let ids: Vec<&str> = cluster.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ayyub", "yaqub", "yunus"]);
    }

    #[tokio::test]
    async fn test_cluster_unknown_tag_is_empty() {
        let clusterer = ThematicClusterer::new(patience_graph());
        assert!(clusterer.cluster_by_tag("gratitude").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_links_within_threshold() {
        let clusterer = ThematicClusterer::new(patience_graph());
        let (cluster, links) = clusterer.thematic_subgraph("patience").await.unwrap();

        assert_eq!(cluster.len(), 3);
        // Only ayyub and yaqub connect within two hops; yunus is isolated.
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].a, "ayyub");
        assert_eq!(links[0].b, "yaqub");
        assert_eq!(links[0].path.len(), 2);
    }

    #[tokio::test]
    async fn test_connect_missing_entity_is_error() {
        let clusterer = ThematicClusterer::new(patience_graph());
        let ids = vec!["ayyub".to_string(), "ghost".to_string()];
        assert!(matches!(
            clusterer.connect(&ids).await,
            Err(GraphError::NodeNotFound { .. })
        ));
    }
}
