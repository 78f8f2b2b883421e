//! Remote graph adapter.
//!
//! [`RemoteGraph`] speaks the server's JSON-RPC protocol over a WebSocket
//! and exposes the result as a [`GraphSource`], so every traversal algorithm
//! runs unchanged against a graph living in another process. Each lookup is
//! one request/response round trip; dropping a traversal future between
//! round trips abandons the traversal without tearing down the connection.

use crate::protocol::{codes, Request, Response};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use silsila_core::{Entity, GraphError};
use silsila_graph::{AdjacencyEntry, GraphSource};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A [`GraphSource`] backed by a silsila server.
///
/// Requests are serialized over one connection; concurrent lookups queue on
/// an internal lock rather than interleaving frames.
pub struct RemoteGraph {
    stream: Mutex<WsStream>,
    next_id: AtomicU64,
}

impl RemoteGraph {
    /// Connects to a server at the given WebSocket URL, e.g.
    /// `ws://127.0.0.1:7641`.
    pub async fn connect(url: &str) -> Result<Self, GraphError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| GraphError::Lookup(format!("connect to {} failed: {}", url, e)))?;
        debug!("connected to {}", url);

        Ok(Self {
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
        })
    }

    /// Sends one request and waits for the response carrying its id.
    async fn call(&self, method: &str, params: Value) -> Result<Response, GraphError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(method, params, id);
        let text = serde_json::to_string(&request)
            .map_err(|e| GraphError::Lookup(format!("encode {} request: {}", method, e)))?;

        let mut stream = self.stream.lock().await;
        stream
            .send(Message::Text(text))
            .await
            .map_err(|e| GraphError::Lookup(format!("send {} request: {}", method, e)))?;

        while let Some(msg) = stream.next().await {
            let msg = msg.map_err(|e| GraphError::Lookup(format!("receive: {}", e)))?;
            if !msg.is_text() {
                continue;
            }
            let response: Response = serde_json::from_str(msg.to_text().unwrap_or(""))
                .map_err(|e| GraphError::Lookup(format!("decode {} response: {}", method, e)))?;
            if response.id == Some(json!(id)) {
                return Ok(response);
            }
            debug!("skipping response with mismatched id");
        }

        Err(GraphError::Lookup(format!(
            "connection closed awaiting {} response",
            method
        )))
    }

    /// Unwraps a successful result, surfacing server-side errors.
    fn into_result(response: Response, method: &str) -> Result<Value, GraphError> {
        if let Some(err) = response.error {
            return Err(GraphError::Lookup(format!(
                "{} failed: {} (code {})",
                method, err.message, err.code
            )));
        }
        response
            .result
            .ok_or_else(|| GraphError::Lookup(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl GraphSource for RemoteGraph {
    async fn entity(&self, id: &str) -> Result<Option<Entity>, GraphError> {
        let response = self.call("entity.get", json!({ "id": id })).await?;
        // An unknown id is an absence, not a lookup failure.
        if let Some(err) = &response.error {
            if err.code == codes::NODE_NOT_FOUND {
                return Ok(None);
            }
        }
        let value = Self::into_result(response, "entity.get")?;
        let entity: Entity = serde_json::from_value(value)
            .map_err(|e| GraphError::Lookup(format!("decode entity: {}", e)))?;
        Ok(Some(entity))
    }

    async fn neighbors(&self, id: &str) -> Result<Vec<AdjacencyEntry>, GraphError> {
        let response = self.call("adjacency", json!({ "id": id })).await?;
        let value = Self::into_result(response, "adjacency")?;
        serde_json::from_value(value)
            .map_err(|e| GraphError::Lookup(format!("decode adjacency: {}", e)))
    }

    async fn entities_by_theme(&self, tag: &str) -> Result<Vec<Entity>, GraphError> {
        let response = self.call("theme.entities", json!({ "tag": tag })).await?;
        let value = Self::into_result(response, "theme.entities")?;
        serde_json::from_value(value)
            .map_err(|e| GraphError::Lookup(format!("decode theme entities: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{QueryServer, ServerConfig};
    use crate::shared;
    use silsila_core::EntityKind;
    use silsila_graph::{
        GraphBuilder, KnowledgeGraph, PathFinder, RelationKind, Relationship, StrengthScorer,
        ThematicClusterer,
    };

    fn sample_graph() -> KnowledgeGraph {
        let mut builder = GraphBuilder::new();
        builder.add_entity(
            Entity::new("ibrahim", "Ibrahim", EntityKind::Person).with_themes(["prophets"]),
        );
        builder.add_entity(
            Entity::new("ismail", "Ismail", EntityKind::Person).with_themes(["prophets"]),
        );
        builder.add_entity(Entity::new("mecca", "Mecca", EntityKind::Place));
        builder.add_entity(Entity::new("patience", "Patience", EntityKind::Concept));
        builder.add_relationship(
            Relationship::new("r1", "ibrahim", "ismail", RelationKind::AncestorOf)
                .with_weight(3.0),
        );
        builder.add_relationship(
            Relationship::new("r2", "ismail", "mecca", RelationKind::LivedIn).bidirectional(),
        );
        builder.add_relationship(Relationship::new(
            "r3",
            "patience",
            "ibrahim",
            RelationKind::ThemeOf,
        ));
        builder.build().unwrap()
    }

    /// Binds a server on an ephemeral port and returns its ws URL.
    async fn spawn_server() -> String {
        let config = ServerConfig {
            addr: "127.0.0.1:0".parse().unwrap(),
        };
        let server = QueryServer::bind(config, shared(sample_graph()))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_remote_lookups() {
        let url = spawn_server().await;
        let remote = RemoteGraph::connect(&url).await.unwrap();

        let entity = remote.entity("ibrahim").await.unwrap().unwrap();
        assert_eq!(entity.label, "Ibrahim");
        assert_eq!(entity.kind, EntityKind::Person);

        assert!(remote.entity("nobody").await.unwrap().is_none());

        let entries = remote.neighbors("ismail").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].neighbor, "mecca");

        assert!(remote.neighbors("nobody").await.unwrap().is_empty());

        let themed = remote.entities_by_theme("prophets").await.unwrap();
        let ids: Vec<&str> = themed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ibrahim", "ismail"]);
    }

    #[tokio::test]
    async fn test_traversal_over_remote_source() {
        let url = spawn_server().await;
        let remote = RemoteGraph::connect(&url).await.unwrap();

        let finder = PathFinder::new(&remote);
        let path = finder
            .shortest_path("ibrahim", "mecca", None, 6)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.entities, vec!["ibrahim", "ismail", "mecca"]);

        // mecca reaches ismail through the reverse side of r2, but has no
        // way back to patience.
        assert!(finder
            .shortest_path("mecca", "patience", None, 6)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_scoring_and_clustering_over_remote_source() {
        let url = spawn_server().await;
        let remote = RemoteGraph::connect(&url).await.unwrap();

        let score = StrengthScorer::new(&remote)
            .score("ibrahim", "ismail")
            .await
            .unwrap();
        assert_eq!(score.direct_weight, Some(3.0));
        assert_eq!(score.shared_neighbors, 0);
        assert_eq!(score.path_length, Some(1));
        // 0.5·(3/5) + 0.2·(1/2)
        assert!((score.composite - 0.4).abs() < 1e-9);

        let (entities, links) = ThematicClusterer::new(&remote)
            .thematic_subgraph("prophets")
            .await
            .unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path.len(), 1);
    }
}
