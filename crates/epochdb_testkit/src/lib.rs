//! # EpochDB Testkit
//!
//! Test utilities for EpochDB.
//!
//! This crate provides:
//! - The clinic demo dataset used by scenario tests
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use epochdb_testkit::fixtures::clinic;
//!
//! #[test]
//! fn test_with_clinic() {
//!     let conn = clinic();
//!     let present = conn.snapshot();
//!     // ... test operations
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
