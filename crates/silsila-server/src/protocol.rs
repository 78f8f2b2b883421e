//! JSON-RPC 2.0 message types and method parameter shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use silsila_core::GraphError;
use silsila_graph::RelationKind;

/// A JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id: Some(Value::from(id)),
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

/// Error codes. The standard JSON-RPC range plus graph-specific codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL: i32 = -32000;
    pub const NODE_NOT_FOUND: i32 = -32001;
    pub const INVALID_BOUND: i32 = -32002;
}

/// A JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl Response {
    /// Wraps a result value. A result that fails to serialize becomes an
    /// internal error response, never a silent `null`.
    pub fn success(id: Option<Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(
                id,
                codes::INTERNAL,
                format!("result serialization failed: {}", e),
            ),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, codes::PARSE_ERROR, "parse error")
    }

    pub fn invalid_params(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::error(id, codes::INVALID_PARAMS, message)
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(
            id,
            codes::METHOD_NOT_FOUND,
            format!("method not found: {method}"),
        )
    }

    /// Maps a graph error onto the wire, preserving its kind.
    pub fn graph_error(id: Option<Value>, err: GraphError) -> Self {
        let code = match &err {
            GraphError::NodeNotFound { .. } => codes::NODE_NOT_FOUND,
            GraphError::InvalidBound { .. } => codes::INVALID_BOUND,
            _ => codes::INTERNAL,
        };
        Self::error(id, code, err.to_string())
    }
}

fn default_depth() -> usize {
    6
}

fn default_max_results() -> usize {
    20
}

fn default_explore_depth() -> usize {
    2
}

fn default_max_nodes() -> usize {
    50
}

fn default_include_edges() -> bool {
    true
}

/// Parameters for `path.shortest` and `path.all`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathParams {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kinds: Option<Vec<RelationKind>>,
    #[serde(default = "default_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Parameters for `explore`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExploreParams {
    pub seed: String,
    #[serde(default = "default_explore_depth")]
    pub depth: usize,
    #[serde(default)]
    pub kinds: Option<Vec<RelationKind>>,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

/// Parameters for `subgraph`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubgraphParams {
    pub ids: Vec<String>,
    #[serde(default)]
    pub kinds: Option<Vec<RelationKind>>,
    #[serde(default = "default_include_edges")]
    pub include_edges: bool,
}

/// Parameters for `score`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreParams {
    pub a: String,
    pub b: String,
}

/// Parameters for `cluster` and `theme.entities`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeParams {
    pub tag: String,
}

/// Parameters for `connect`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectParams {
    pub ids: Vec<String>,
}

/// Parameters for `entity.get` and `adjacency`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityParams {
    pub id: String,
}
