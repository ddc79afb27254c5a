//! Snapshots: immutable database values.

use crate::attr::{AttrName, Attribute};
use crate::entity::{Entity, EntityId};
use crate::index::{Index, Permutation};
use crate::storage::Storage;
use crate::value::Value;
use std::sync::Arc;

/// An immutable value representing the whole database at one logical time.
///
/// A snapshot holds the entity storage, the three permutation indices, the
/// auto-id counter, and its own position in the connection's history
/// (`time`). Snapshots are never mutated; the transactor derives a new
/// snapshot from an old one, sharing every untouched substructure.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) storage: Storage,
    pub(crate) eavt: Index,
    pub(crate) avet: Index,
    pub(crate) veat: Index,
    pub(crate) top_id: u64,
    pub(crate) time: u64,
}

impl Snapshot {
    /// The empty snapshot at time 0, the root of every connection's
    /// history.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            storage: Storage::new(),
            eavt: Index::new(Permutation::Eavt),
            avet: Index::new(Permutation::Avet),
            veat: Index::new(Permutation::Veat),
            top_id: 0,
            time: 0,
        }
    }

    /// This snapshot's logical time, equal to its 0-based position in the
    /// history.
    #[must_use]
    pub fn time(&self) -> u64 {
        self.time
    }

    /// The entity storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// One of the three permutation indices.
    #[must_use]
    pub fn index(&self, perm: Permutation) -> &Index {
        match perm {
            Permutation::Eavt => &self.eavt,
            Permutation::Avet => &self.avet,
            Permutation::Veat => &self.veat,
        }
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Arc<Entity>> {
        self.storage.get(id)
    }

    /// Looks up an attribute of an entity.
    #[must_use]
    pub fn attr(&self, id: &EntityId, name: &AttrName) -> Option<&Attribute> {
        self.storage.get(id).and_then(|e| e.attr(name))
    }

    /// Looks up the value of an attribute of an entity.
    #[must_use]
    pub fn value_of(&self, id: &EntityId, name: &AttrName) -> Option<&Value> {
        self.attr(id, name).map(Attribute::value)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
