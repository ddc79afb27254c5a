//! Present-state entity storage.

use crate::entity::{Entity, EntityId};
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from entity id to the current form of each live entity in a
/// snapshot.
///
/// Entities are held behind `Arc`, so cloning a `Storage` (which every
/// transact does) shares every entity the new snapshot leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    entities: HashMap<EntityId, Arc<Entity>>,
}

impl Storage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Arc<Entity>> {
        self.entities.get(id)
    }

    /// Returns true if the id is present.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entities are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates all live entities in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.entities.values()
    }

    pub(crate) fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id().clone(), Arc::new(entity));
    }

    pub(crate) fn remove(&mut self, id: &EntityId) -> Option<Arc<Entity>> {
        self.entities.remove(id)
    }

    /// Clone-on-write access to a stored entity.
    pub(crate) fn entry_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id).map(Arc::make_mut)
    }
}
