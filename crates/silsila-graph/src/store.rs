//! Persistent store for bulk records and built snapshots.
//!
//! The store plays the "external collaborator" role: it hands the builder
//! entity and relationship records in bulk. The last built graph is also
//! cached so query commands can skip a rebuild.

use crate::graph::KnowledgeGraph;
use silsila_core::{EntityRecord, RelationshipRecord};
use sled::Db;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const KEY_ENTITIES: &str = "records/entities";
const KEY_RELATIONSHIPS: &str = "records/relationships";
const KEY_GRAPH: &str = "graph/current";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub struct GraphStore {
    db: Db,
}

impl GraphStore {
    /// Opens or creates a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Saves the bulk records, replacing any previous set.
    pub fn save_records(
        &self,
        entities: &[EntityRecord],
        relationships: &[RelationshipRecord],
    ) -> Result<(), StoreError> {
        self.db.insert(KEY_ENTITIES, bincode::serialize(entities)?)?;
        self.db
            .insert(KEY_RELATIONSHIPS, bincode::serialize(relationships)?)?;
        self.db.flush()?;
        info!(
            entities = entities.len(),
            relationships = relationships.len(),
            "records saved"
        );
        Ok(())
    }

    /// Loads the bulk records, if any were saved.
    pub fn load_records(
        &self,
    ) -> Result<Option<(Vec<EntityRecord>, Vec<RelationshipRecord>)>, StoreError> {
        let (Some(entities), Some(relationships)) =
            (self.db.get(KEY_ENTITIES)?, self.db.get(KEY_RELATIONSHIPS)?)
        else {
            return Ok(None);
        };
        Ok(Some((
            bincode::deserialize(&entities)?,
            bincode::deserialize(&relationships)?,
        )))
    }

    /// Caches a built snapshot.
    pub fn save_graph(&self, graph: &KnowledgeGraph) -> Result<(), StoreError> {
        let bytes = bincode::serialize(graph)?;
        self.db.insert(KEY_GRAPH, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Loads the cached snapshot, if one exists.
    pub fn load_graph(&self) -> Result<Option<KnowledgeGraph>, StoreError> {
        match self.db.get(KEY_GRAPH)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Removes records and the cached snapshot.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.remove(KEY_ENTITIES)?;
        self.db.remove(KEY_RELATIONSHIPS)?;
        self.db.remove(KEY_GRAPH)?;
        self.db.flush()?;
        Ok(())
    }
}
