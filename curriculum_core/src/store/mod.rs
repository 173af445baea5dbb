//! Entity Store
//!
//! Create/read persistence for curriculum entities. The store handle is
//! constructed once by the caller and passed explicitly to everything that
//! needs it; there is no process-wide instance.
//!
//! Backends:
//! - [`SqliteStore`]: file-backed (or in-memory) SQLite via rusqlite
//! - [`InMemoryStore`]: `BTreeMap`-backed fake for tests and throwaway runs

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Identifies a stored entity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }

    pub fn of(entity: &Entity) -> Self {
        Self::new(entity.kind(), entity.id())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Create/read access to curriculum entities.
///
/// Entities are created once and never updated; creating an existing
/// `(kind, id)` fails with [`StoreError::AlreadyExists`].
pub trait EntityStore {
    fn create(&mut self, entity: Entity) -> Result<EntityKey, StoreError>;

    fn get(&self, kind: EntityKind, id: &str) -> Result<Entity, StoreError>;

    /// All entities of a kind, ordered by id
    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StoreError>;

    fn contains(&self, kind: EntityKind, id: &str) -> Result<bool, StoreError> {
        match self.get(kind, id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Opens the store a [`crate::config::StoreLocation`] points at
pub fn open(location: &crate::config::StoreLocation) -> Result<Box<dyn EntityStore>, StoreError> {
    use crate::config::StoreLocation;

    match location {
        StoreLocation::InMemory => {
            log::info!("[STORE] Using in-memory store");
            Ok(Box::new(InMemoryStore::new()))
        }
        StoreLocation::File(path) => Ok(Box::new(SqliteStore::open(path)?)),
    }
}
