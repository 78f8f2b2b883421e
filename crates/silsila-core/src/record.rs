//! Raw bulk-load records.
//!
//! The external content store delivers entities and relationships as loosely
//! typed records: kind fields are free strings, weights are optional. These
//! shapes exist so that loading and validation happen in exactly one place
//! (the graph builder) instead of ad hoc at every call site.

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default relationship weight when a record omits one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// An entity as delivered by the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,

    /// Free-string kind; parsed once into [`EntityKind`] at load time.
    #[serde(rename = "type")]
    pub kind: String,

    pub label: String,

    #[serde(default)]
    pub alt_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub citations: BTreeSet<String>,

    #[serde(default)]
    pub themes: BTreeSet<String>,
}

impl EntityRecord {
    /// Converts the raw record into a typed entity.
    ///
    /// Unrecognized kind strings map to [`EntityKind::Unknown`]; they are
    /// never carried through as new kinds.
    pub fn into_entity(self) -> Entity {
        Entity {
            id: self.id,
            kind: EntityKind::parse(&self.kind),
            label: self.label,
            alt_labels: self.alt_labels,
            attributes: self.attributes,
            citations: self.citations,
            themes: self.themes,
        }
    }
}

/// A relationship as delivered by the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub id: String,
    pub source_id: String,
    pub target_id: String,

    /// Free-string kind; parsed once by the graph builder.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Positive finite weight. `None` means [`DEFAULT_WEIGHT`].
    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub bidirectional: bool,
}

impl RelationshipRecord {
    /// Returns the effective weight, applying the default.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }
}
