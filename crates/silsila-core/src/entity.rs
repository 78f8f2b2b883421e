//! Entity types for the knowledge graph.
//!
//! An entity is a node: a person, a place, a concept, an event, or a named
//! attribute. The kind set is closed; input that names anything else is
//! mapped to an explicit `Unknown` variant once at load time, never accepted
//! as a new kind.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The kind of a knowledge-graph entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A person (prophet, scholar, historical figure).
    Person,

    /// A geographic place.
    Place,

    /// A named attribute or epithet attached to other entities.
    NamedAttribute,

    /// An abstract concept or theme.
    Concept,

    /// A historical event.
    Event,

    /// Fallback for input whose kind string is not recognized.
    #[serde(other)]
    Unknown,
}

impl EntityKind {
    /// Parses a kind string from a raw record.
    ///
    /// Unrecognized strings map to `Unknown`; validation happens here,
    /// once, at load time.
    pub fn parse(s: &str) -> Self {
        match s {
            "person" => Self::Person,
            "place" => Self::Place,
            "named_attribute" => Self::NamedAttribute,
            "concept" => Self::Concept,
            "event" => Self::Event,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::NamedAttribute => "named_attribute",
            Self::Concept => "concept",
            Self::Event => "event",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable unique id, e.g. "person:ibrahim". Unique across the graph.
    pub id: String,

    /// The entity kind. Always a recognized variant after loading.
    pub kind: EntityKind,

    /// Primary display label.
    pub label: String,

    /// Localized alternate labels keyed by language code.
    #[serde(default)]
    pub alt_labels: BTreeMap<String, String>,

    /// Free-form attributes (era, region, honorific, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Reference/citation tags pointing into the source catalogs.
    #[serde(default)]
    pub citations: BTreeSet<String>,

    /// Theme tags; drive thematic clustering.
    #[serde(default)]
    pub themes: BTreeSet<String>,
}

impl Entity {
    /// Creates an entity with empty attribute and tag sets.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            alt_labels: BTreeMap::new(),
            attributes: BTreeMap::new(),
            citations: BTreeSet::new(),
            themes: BTreeSet::new(),
        }
    }

    /// Adds theme tags (builder style, used heavily in tests and loaders).
    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes.extend(themes.into_iter().map(Into::into));
        self
    }

    /// Adds an attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns true if this entity carries the given theme tag.
    pub fn has_theme(&self, tag: &str) -> bool {
        self.themes.contains(tag)
    }
}
