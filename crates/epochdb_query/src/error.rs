//! Error types for the query engine.

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while compiling or executing a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A clause does not match the accepted term shapes.
    #[error("malformed clause: {message}")]
    MalformedClause {
        /// What was wrong with the clause.
        message: String,
    },

    /// The query cannot be executed by this engine.
    #[error("unsupported query: {message}")]
    UnsupportedQuery {
        /// Why the query is unsupported.
        message: String,
    },
}

impl QueryError {
    /// Creates a malformed-clause error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedClause {
            message: message.into(),
        }
    }

    /// Creates an unsupported-query error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedQuery {
            message: message.into(),
        }
    }
}
