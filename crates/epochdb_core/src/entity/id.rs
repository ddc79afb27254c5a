//! Entity identifier.

use std::fmt;
use std::sync::Arc;

/// Unique identifier for an entity.
///
/// Entity ids are user-chosen opaque keys, typically short symbols such as
/// `pat1` or `t3-pat2`. They are cheap to clone (interned string) and are:
/// - Unique within a snapshot's storage
/// - Immutable once assigned
/// - Ordered and hashable, so they can key index levels
///
/// The empty id is reserved as the auto-id sentinel: the transactor assigns
/// a fresh id from the snapshot's id counter when such an entity is added.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(Arc<str>);

impl EntityId {
    /// Creates an entity id from a string key.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Creates the auto-id sentinel.
    ///
    /// An entity carrying this id is assigned a generated id when added.
    #[must_use]
    pub fn auto() -> Self {
        Self(Arc::from(""))
    }

    /// Returns true for the auto-id sentinel.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
