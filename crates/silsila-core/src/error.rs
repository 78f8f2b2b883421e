//! The error type shared by graph construction and every query component.

use thiserror::Error;

/// Errors raised while building or querying the knowledge graph.
///
/// A path that does not exist is *not* an error: `shortest_path` returns
/// `Ok(None)` and `all_paths` returns an empty vec. Errors are reserved for
/// malformed input, unknown ids, and backing-store failures.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A start/end/seed id is absent from the built graph.
    #[error("entity not found: {id}")]
    NodeNotFound { id: String },

    /// A depth or result limit was zero.
    #[error("invalid bound: {what} must be at least 1 (got {value})")]
    InvalidBound { what: &'static str, value: usize },

    /// A relationship referenced an entity missing from the same build.
    #[error("relationship {relationship} references unknown entity {entity}")]
    UnknownEndpoint {
        relationship: String,
        entity: String,
    },

    /// Two entities in one build shared an id.
    #[error("duplicate entity id: {id}")]
    DuplicateEntity { id: String },

    /// A relationship carried a non-positive or non-finite weight.
    #[error("relationship {relationship} has invalid weight {weight}")]
    InvalidWeight { relationship: String, weight: f64 },

    /// The backing store failed during a lookup (remote shape). Never
    /// swallowed into a truncated result; always propagated to the caller.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl GraphError {
    /// Convenience constructor for the most common error.
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }
}
