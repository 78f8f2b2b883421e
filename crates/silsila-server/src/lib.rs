//! Silsila Server - WebSocket query server for the knowledge graph
//!
//! Exposes the traversal operations over JSON-RPC 2.0 so that IDEs, web
//! frontends, and remote traversal clients can query one shared graph.
//!
//! The server supports:
//! - Multiple concurrent connections over one immutable graph snapshot
//! - Publish-by-swap rebuilds (readers never see a half-built graph)
//! - A per-lookup surface (`entity.get`, `adjacency`, `theme.entities`)
//!   that backs [`RemoteGraph`], the remote-shape adapter for the
//!   traversal engine

use silsila_graph::KnowledgeGraph;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared graph state across connections.
///
/// The inner `Arc` is the published snapshot: readers clone it and query
/// lock-free; a rebuild swaps it under the write lock instead of mutating
/// in place.
pub type SharedGraph = Arc<RwLock<Arc<KnowledgeGraph>>>;

/// Wraps a freshly built graph for sharing.
pub fn shared(graph: KnowledgeGraph) -> SharedGraph {
    Arc::new(RwLock::new(Arc::new(graph)))
}

/// Clones the current snapshot out of the shared state.
pub async fn snapshot(graph: &SharedGraph) -> Arc<KnowledgeGraph> {
    graph.read().await.clone()
}

/// Publishes a new snapshot, atomically replacing the old one.
pub async fn publish(graph: &SharedGraph, next: KnowledgeGraph) {
    let mut guard = graph.write().await;
    *guard = Arc::new(next);
}

mod client;
mod handlers;
mod protocol;
mod server;

pub use client::RemoteGraph;
pub use protocol::{Request, Response, RpcError};
pub use server::{QueryServer, ServerConfig};
