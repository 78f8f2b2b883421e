//! Relationship types for the knowledge graph.
//!
//! Relationships are typed, weighted, optionally bidirectional edges. The
//! kind set is closed; unrecognized input maps to an explicit `Other`
//! variant at load time.

use serde::{Deserialize, Serialize};
use silsila_core::{GraphError, RelationshipRecord, DEFAULT_WEIGHT};

/// The kind of relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Source is an ancestor of target.
    AncestorOf,

    /// Source is a descendant of target.
    DescendantOf,

    /// A person lived in a place.
    LivedIn,

    /// A concept is the theme of a story or event.
    ThemeOf,

    /// Two people lived in the same era.
    ContemporaryOf,

    /// An entity is mentioned in a source text.
    MentionedIn,

    /// Source taught target.
    TeacherOf,

    /// An entity took part in an event.
    ParticipantIn,

    /// Fallback for input whose kind string is not recognized.
    #[serde(other)]
    Other,
}

impl RelationKind {
    /// Parses a kind string from a raw record. Unrecognized strings map
    /// to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "ancestor_of" => Self::AncestorOf,
            "descendant_of" => Self::DescendantOf,
            "lived_in" => Self::LivedIn,
            "theme_of" => Self::ThemeOf,
            "contemporary_of" => Self::ContemporaryOf,
            "mentioned_in" => Self::MentionedIn,
            "teacher_of" => Self::TeacherOf,
            "participant_in" => Self::ParticipantIn,
            _ => Self::Other,
        }
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AncestorOf => "ancestor_of",
            Self::DescendantOf => "descendant_of",
            Self::LivedIn => "lived_in",
            Self::ThemeOf => "theme_of",
            Self::ContemporaryOf => "contemporary_of",
            Self::MentionedIn => "mentioned_in",
            Self::TeacherOf => "teacher_of",
            Self::ParticipantIn => "participant_in",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An edge in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,

    /// Id of the source entity. Must exist in the same build.
    pub source: String,

    /// Id of the target entity. Must exist in the same build.
    pub target: String,

    pub kind: RelationKind,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Positive finite weight; 1.0 by default.
    pub weight: f64,

    /// Bidirectional edges are indexed under both endpoints.
    pub bidirectional: bool,
}

impl Relationship {
    /// Creates a one-way relationship with the default weight.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            description: None,
            weight: DEFAULT_WEIGHT,
            bidirectional: false,
        }
    }

    /// Sets the weight (builder style).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Marks the relationship bidirectional (builder style).
    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    /// Converts a raw record into a typed relationship, validating the
    /// weight. Endpoint existence is the builder's job.
    pub fn from_record(record: RelationshipRecord) -> Result<Self, GraphError> {
        let weight = record.effective_weight();
        if !(weight.is_finite() && weight > 0.0) {
            return Err(GraphError::InvalidWeight {
                relationship: record.id,
                weight,
            });
        }

        Ok(Self {
            id: record.id,
            source: record.source_id,
            target: record.target_id,
            kind: RelationKind::parse(&record.kind),
            description: record.description,
            weight,
            bidirectional: record.bidirectional,
        })
    }
}

/// An edge in a query result set, oriented source → target.
///
/// Used both as the per-hop descriptor in a [`crate::Path`] and as the edge
/// list of neighborhood/subgraph results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub relationship: String,
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    pub weight: f64,
}
