//! Attributes: typed, optionally indexed, versioned entity properties.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A namespaced attribute name, e.g. `patient/city`.
///
/// Like [`crate::EntityId`], attribute names are interned strings so they can
/// be cloned freely into index paths.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrName(Arc<str>);

impl AttrName {
    /// Creates an attribute name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrName({})", self.0)
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttrName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AttrName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Declared type of an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Text values.
    String,
    /// Integer or real values.
    Number,
    /// Boolean values.
    Boolean,
    /// References to other entities. Reference-typed attributes participate
    /// in graph traversal.
    Ref,
}

impl TypeTag {
    /// Returns true if a single (non-set) value conforms to this type.
    ///
    /// Sets never conform directly; the transactor validates each member of
    /// a multi-cardinality value instead.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeTag::String, Value::Text(_))
                | (TypeTag::Number, Value::Int(_) | Value::Real(_))
                | (TypeTag::Boolean, Value::Bool(_))
                | (TypeTag::Ref, Value::Ref(_))
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Ref => "ref",
        };
        f.write_str(name)
    }
}

/// Whether an attribute holds one value or a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// One value.
    #[default]
    Single,
    /// A set of values.
    Multiple,
}

/// A typed, optionally indexed, single- or multi-valued property of an
/// entity, with version timestamps.
///
/// `curr_ts` is the snapshot index at which this version of the attribute
/// took effect; `prev_ts` is the snapshot index of the previous version, or
/// `None` for the first. The timestamps are stamped by the transactor; a
/// freshly built attribute carries `curr_ts = 0` and no predecessor.
///
/// # Example
///
/// ```rust,ignore
/// let city = Attribute::new("patient/city", "London", TypeTag::String)
///     .indexed(true);
/// let symptoms = Attribute::new("patient/symptoms", Value::set(["fever"]), TypeTag::String)
///     .indexed(true)
///     .cardinality(Cardinality::Multiple);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: AttrName,
    value: Value,
    vtype: TypeTag,
    cardinality: Cardinality,
    indexed: bool,
    prev_ts: Option<u64>,
    curr_ts: u64,
}

impl Attribute {
    /// Creates an attribute with default options: single cardinality, not
    /// indexed.
    #[must_use]
    pub fn new(name: impl Into<AttrName>, value: impl Into<Value>, vtype: TypeTag) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            vtype,
            cardinality: Cardinality::Single,
            indexed: false,
            prev_ts: None,
            curr_ts: 0,
        }
    }

    /// Sets the indexed flag. Only indexed attributes appear in the three
    /// permutation indices.
    #[must_use]
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Sets the cardinality.
    #[must_use]
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// The attribute's name.
    #[must_use]
    pub fn name(&self) -> &AttrName {
        &self.name
    }

    /// The attribute's current value. For multi-cardinality attributes this
    /// is always a set once the attribute is stored.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The declared value type.
    #[must_use]
    pub fn vtype(&self) -> TypeTag {
        self.vtype
    }

    /// The declared cardinality.
    #[must_use]
    pub fn cardinality_of(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether the attribute participates in the indices.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Whether the attribute holds entity references.
    #[must_use]
    pub fn is_ref(&self) -> bool {
        self.vtype == TypeTag::Ref
    }

    /// Snapshot index at which the previous version existed, if any.
    #[must_use]
    pub fn prev_ts(&self) -> Option<u64> {
        self.prev_ts
    }

    /// Snapshot index at which this version took effect.
    #[must_use]
    pub fn curr_ts(&self) -> u64 {
        self.curr_ts
    }

    /// Iterates the attribute's value(s), expanding a set into its members.
    pub fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match &self.value {
            Value::Set(s) => Box::new(s.iter()),
            v => Box::new(std::iter::once(v)),
        }
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Stamps the version timestamps.
    pub(crate) fn stamp(&mut self, prev_ts: Option<u64>, curr_ts: u64) {
        self.prev_ts = prev_ts;
        self.curr_ts = curr_ts;
    }
}
