//! WebSocket server implementation.
//!
//! Accepts connections, parses JSON-RPC messages, and routes them to
//! handlers. Each connection runs in its own task over the same published
//! snapshot.

use crate::handlers::{
    handle_adjacency, handle_all_paths, handle_cluster, handle_connect, handle_entity_get,
    handle_explore, handle_info, handle_score, handle_shortest_path, handle_subgraph,
    handle_theme_entities,
};
use crate::protocol::{Request, Response};
use crate::SharedGraph;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Server configuration.
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:7641".parse().expect("static addr"),
        }
    }
}

/// The Silsila query server.
pub struct QueryServer {
    listener: TcpListener,
    graph: SharedGraph,
}

impl QueryServer {
    /// Binds the listener. Separate from `run` so callers (and tests) can
    /// learn the bound address before accepting.
    pub async fn bind(config: ServerConfig, graph: SharedGraph) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.addr).await?;
        Ok(Self { listener, graph })
    }

    /// The locally bound address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns a handle to the shared graph for rebuild publishing.
    pub fn graph(&self) -> SharedGraph {
        self.graph.clone()
    }

    /// Runs the server, accepting connections forever.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("silsila server listening on {}", self.listener.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("new connection from {}", addr);
                    let graph = self.graph.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, graph).await {
                            error!("connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    graph: SharedGraph,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = accept_async(stream).await?;
    debug!("websocket established with {}", addr);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("message error from {}: {}", addr, e);
                break;
            }
        };

        if msg.is_close() {
            debug!("client {} disconnected", addr);
            break;
        }

        if msg.is_ping() {
            write.send(Message::Pong(msg.into_data())).await?;
            continue;
        }

        if msg.is_text() {
            let text = msg.to_text().unwrap_or("");
            let response = process_message(text, graph.clone()).await;
            let json = serde_json::to_string(&response)?;
            write.send(Message::Text(json)).await?;
        }
    }

    debug!("connection closed: {}", addr);
    Ok(())
}

/// Parses a JSON-RPC message and routes it to the matching handler.
async fn process_message(text: &str, graph: SharedGraph) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("processing method: {}", method);

    macro_rules! route {
        ($handler:ident) => {
            match serde_json::from_value(request.params) {
                Ok(params) => $handler(graph, id, params).await,
                Err(e) => Response::invalid_params(id, e.to_string()),
            }
        };
    }

    match method {
        "graph.info" => handle_info(graph, id).await,
        "entity.get" => route!(handle_entity_get),
        "adjacency" => route!(handle_adjacency),
        "theme.entities" => route!(handle_theme_entities),
        "path.shortest" => route!(handle_shortest_path),
        "path.all" => route!(handle_all_paths),
        "explore" => route!(handle_explore),
        "subgraph" => route!(handle_subgraph),
        "score" => route!(handle_score),
        "cluster" => route!(handle_cluster),
        "connect" => route!(handle_connect),
        _ => Response::method_not_found(id, method),
    }
}
