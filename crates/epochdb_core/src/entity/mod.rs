//! Entities: identified records carrying named attributes.

mod id;

pub use id::EntityId;

use crate::attr::{AttrName, Attribute};
use std::collections::HashMap;

/// A record identified by an opaque key, carrying named attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    attrs: HashMap<AttrName, Attribute>,
}

impl Entity {
    /// Creates an entity with the given id and no attributes.
    #[must_use]
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            attrs: HashMap::new(),
        }
    }

    /// Creates an entity with the auto-id sentinel. The transactor assigns
    /// a generated id when the entity is added.
    #[must_use]
    pub fn auto() -> Self {
        Self::new(EntityId::auto())
    }

    /// Adds or replaces an attribute, builder style.
    #[must_use]
    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.insert(attr.name().clone(), attr);
        self
    }

    /// The entity's identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &AttrName) -> Option<&Attribute> {
        self.attrs.get(name)
    }

    /// Iterates the entity's attributes in no particular order.
    pub fn attrs(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.values()
    }

    /// Number of attributes on the entity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if the entity has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn attr_mut(&mut self, name: &AttrName) -> Option<&mut Attribute> {
        self.attrs.get_mut(name)
    }

    pub(crate) fn attrs_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.attrs.values_mut()
    }
}
