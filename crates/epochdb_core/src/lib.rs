//! # EpochDB Core
//!
//! In-memory, immutable, time-traveling EAV database engine.
//!
//! This crate provides:
//! - The value/attribute/entity data model
//! - The three EAV permutation indices (`EAVT`, `AVET`, `VEAT`)
//! - Immutable snapshots with structural sharing between neighbours
//! - Connections: ordered snapshot histories with compare-and-set commit
//! - The transactor (add/update/remove entities, one snapshot per transact)
//! - Attribute evolution and reference-graph traversal
//!
//! Queries live in the companion `epochdb_query` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use epochdb_core::{registry, Attribute, Entity, Op, TypeTag};
//!
//! let conn = registry::open("clinic");
//! conn.transact(&[Op::add(
//!     Entity::new("pat1")
//!         .with_attr(Attribute::new("patient/city", "London", TypeTag::String).indexed(true)),
//! )])?;
//!
//! let present = conn.snapshot();
//! assert_eq!(present.time(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod attr;
pub mod connection;
pub mod datom;
pub mod entity;
pub mod error;
pub mod graph;
pub mod history;
pub mod index;
pub mod registry;
pub mod snapshot;
pub mod storage;
pub mod transact;
pub mod value;

pub use attr::{AttrName, Attribute, Cardinality, TypeTag};
pub use connection::{Connection, History};
pub use datom::{Datom, Item};
pub use entity::{Entity, EntityId};
pub use error::{CoreError, CoreResult};
pub use graph::{traverse_db, Direction, Strategy, Traversal};
pub use history::evolution_of;
pub use index::{Index, InnerLevel, Permutation};
pub use snapshot::Snapshot;
pub use storage::Storage;
pub use transact::{Op, UpdateOp};
pub use value::Value;
