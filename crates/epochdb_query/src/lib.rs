//! # EpochDB Query
//!
//! Datalog-style query engine over `epochdb_core` snapshots.
//!
//! A query is a `find` list of variables plus `where` clauses of
//! `[e-term, a-term, v-term]` triples. Clauses compile into predicate
//! triplets with captured variable names; the executor picks the index
//! whose leaf level holds the join variable, filters each clause down that
//! index, joins leaf items by how many clauses they answer, and projects
//! bindings onto the `find` list.
//!
//! # Example
//!
//! ```rust,ignore
//! use epochdb_query::{preds, q, Clause, Operand, Query, Term};
//! use epochdb_core::Item;
//!
//! // {:find [?id ?b] :where [[?id :test/bp-systolic (> 200 ?b)]]}
//! let query = Query::find(["?id", "?b"]).where_clause(Clause::new(
//!     Term::var("?id"),
//!     Term::lit(Item::attr("test/bp-systolic")),
//!     Term::binary(preds::gt, Operand::lit(200i64), Operand::var("?b")),
//! ));
//! let rows = q(&snapshot, &query)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compile;
pub mod error;
pub mod exec;
pub mod preds;
pub mod term;

pub use compile::{compile_clause, compile_query, PredicateClause};
pub use error::{QueryError, QueryResult};
pub use exec::{q, Row};
pub use term::{BinPred, Clause, Operand, Pred, Query, Term};
