//! Error types for the EpochDB core engine.

use crate::attr::{AttrName, TypeTag};
use crate::entity::EntityId;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in EpochDB core operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A referenced entity id is absent from storage.
    #[error("unknown entity: {id}")]
    UnknownEntity {
        /// The id that was looked up.
        id: EntityId,
    },

    /// An attribute name is absent on the referenced entity.
    #[error("unknown attribute {attr} on entity {id}")]
    UnknownAttribute {
        /// The entity that was inspected.
        id: EntityId,
        /// The attribute name that was not found.
        attr: AttrName,
    },

    /// An entity with the same id is already present in storage.
    #[error("duplicate entity: {id}")]
    DuplicateEntity {
        /// The conflicting id.
        id: EntityId,
    },

    /// A value is incompatible with the attribute's declared type.
    #[error("type mismatch on {attr}: expected {expected}, got {got}")]
    TypeMismatch {
        /// The attribute being written.
        attr: AttrName,
        /// The attribute's declared type.
        expected: TypeTag,
        /// Short description of the offending value's shape.
        got: &'static str,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// The connection has been dropped from the registry.
    #[error("connection is closed")]
    ConnectionClosed,
}

impl CoreError {
    /// Creates an unknown-entity error.
    pub fn unknown_entity(id: EntityId) -> Self {
        Self::UnknownEntity { id }
    }

    /// Creates an unknown-attribute error.
    pub fn unknown_attribute(id: EntityId, attr: AttrName) -> Self {
        Self::UnknownAttribute { id, attr }
    }

    /// Creates a duplicate-entity error.
    pub fn duplicate_entity(id: EntityId) -> Self {
        Self::DuplicateEntity { id }
    }

    /// Creates a type-mismatch error.
    pub fn type_mismatch(attr: AttrName, expected: TypeTag, got: &'static str) -> Self {
        Self::TypeMismatch {
            attr,
            expected,
            got,
        }
    }

    /// Creates an invalid-operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
