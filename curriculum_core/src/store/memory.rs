//! In-memory entity store

use super::{EntityKey, EntityStore, StoreError};
use crate::types::{Entity, EntityKind};
use std::collections::BTreeMap;

/// `BTreeMap`-backed store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entities: BTreeMap<EntityKind, BTreeMap<String, Entity>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entities across all kinds
    pub fn len(&self) -> usize {
        self.entities.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityStore for InMemoryStore {
    fn create(&mut self, entity: Entity) -> Result<EntityKey, StoreError> {
        let key = EntityKey::of(&entity);
        let bucket = self.entities.entry(key.kind).or_default();
        if bucket.contains_key(&key.id) {
            return Err(StoreError::AlreadyExists {
                kind: key.kind,
                id: key.id,
            });
        }
        bucket.insert(key.id.clone(), entity);
        log::debug!("[STORE] Created {}", key);
        Ok(key)
    }

    fn get(&self, kind: EntityKind, id: &str) -> Result<Entity, StoreError> {
        self.entities
            .get(&kind)
            .and_then(|bucket| bucket.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StoreError> {
        Ok(self
            .entities
            .get(&kind)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Course, Skill};

    #[test]
    fn test_create_get_list() {
        let mut store = InMemoryStore::new();
        let key = store
            .create(Skill::new("S2", "SQL", "Relational queries").into())
            .unwrap();
        assert_eq!(key, EntityKey::new(EntityKind::Skill, "S2"));
        store.create(Skill::new("S1", "Python", "").into()).unwrap();
        store.create(Course::new("C1", "Intro").into()).unwrap();

        let skill = store.get(EntityKind::Skill, "S2").unwrap().into_skill().unwrap();
        assert_eq!(skill.name, "SQL");

        let ids: Vec<String> = store
            .list(EntityKind::Skill)
            .unwrap()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert!(store.list(EntityKind::JobRequirement).unwrap().is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_missing_entity_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get(EntityKind::Course, "nope").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.contains(EntityKind::Course, "nope").unwrap());
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let mut store = InMemoryStore::new();
        store.create(Skill::new("S1", "Python", "").into()).unwrap();
        let err = store
            .create(Skill::new("S1", "Other", "").into())
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { kind: EntityKind::Skill, .. }));

        // same id under a different kind is fine
        store.create(Course::new("S1", "Course").into()).unwrap();
        let skill = store.get(EntityKind::Skill, "S1").unwrap().into_skill().unwrap();
        assert_eq!(skill.name, "Python");
    }
}
