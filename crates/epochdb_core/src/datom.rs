//! Datoms and their components.

use crate::attr::AttrName;
use crate::entity::EntityId;
use crate::value::Value;
use std::fmt;

/// An `(entity, attribute, value)` triple, the unit of indexed data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datom {
    /// The entity component.
    pub entity: EntityId,
    /// The attribute-name component.
    pub attr: AttrName,
    /// The value component.
    pub value: Value,
}

impl Datom {
    /// Creates a datom.
    #[must_use]
    pub fn new(
        entity: impl Into<EntityId>,
        attr: impl Into<AttrName>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            entity: entity.into(),
            attr: attr.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Datom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.entity, self.attr, self.value)
    }
}

/// One component of a datom.
///
/// This is the key type at every index level and the binding value type in
/// query results: depending on the index permutation, a level holds entity
/// ids, attribute names, or values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Item {
    /// An entity id.
    Entity(EntityId),
    /// An attribute name.
    Attr(AttrName),
    /// A value.
    Value(Value),
}

impl Item {
    /// Creates an entity item.
    #[must_use]
    pub fn entity(id: impl Into<EntityId>) -> Self {
        Item::Entity(id.into())
    }

    /// Creates an attribute-name item.
    #[must_use]
    pub fn attr(name: impl Into<AttrName>) -> Self {
        Item::Attr(name.into())
    }

    /// Creates a value item.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Item::Value(value.into())
    }

    /// Gets this item as an entity id, if it is one.
    #[must_use]
    pub fn as_entity(&self) -> Option<&EntityId> {
        match self {
            Item::Entity(id) => Some(id),
            _ => None,
        }
    }

    /// Gets this item as an attribute name, if it is one.
    #[must_use]
    pub fn as_attr(&self) -> Option<&AttrName> {
        match self {
            Item::Attr(name) => Some(name),
            _ => None,
        }
    }

    /// Gets this item as a value, if it is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Entity(id) => write!(f, "{id}"),
            Item::Attr(name) => write!(f, "{name}"),
            Item::Value(v) => write!(f, "{v}"),
        }
    }
}

impl From<EntityId> for Item {
    fn from(id: EntityId) -> Self {
        Item::Entity(id)
    }
}

impl From<AttrName> for Item {
    fn from(name: AttrName) -> Self {
        Item::Attr(name)
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::Value(Value::Int(n))
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Item::Value(Value::Int(i64::from(n)))
    }
}

impl From<f64> for Item {
    fn from(r: f64) -> Self {
        Item::Value(Value::Real(r))
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Item::Value(Value::Bool(b))
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Value(Value::Text(s.to_string()))
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Value(Value::Text(s))
    }
}
