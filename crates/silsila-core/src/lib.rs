//! Silsila Core - Entity model for the knowledge graph
//!
//! This crate defines the entities that populate the graph (people, places,
//! concepts, events, named attributes), the raw bulk-load records delivered
//! by an external content store, and the error type shared by every query
//! component.
//!
//! Entities are plain, id-addressed data. All relationship handling lives in
//! `silsila-graph`; this crate stays free of graph machinery so that loaders
//! and presentation layers can depend on it alone.

mod entity;
mod error;
mod record;

pub use entity::{Entity, EntityKind};
pub use error::GraphError;
pub use record::{EntityRecord, RelationshipRecord, DEFAULT_WEIGHT};
