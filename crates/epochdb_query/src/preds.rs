//! Comparison predicates over datom components.
//!
//! These are the building blocks for unary and binary predicate terms.
//! Comparisons are forgiving the way the executor requires: a comparison
//! between components that cannot be compared (a number against an entity
//! id, text against a boolean) is simply `false`, never an error, so one
//! heterogenous leaf cannot fail a whole query.

use epochdb_core::{Item, Value};
use std::cmp::Ordering;

fn as_num(item: &Item) -> Option<f64> {
    match item.as_value()? {
        Value::Int(n) => Some(*n as f64),
        Value::Real(r) => Some(*r),
        _ => None,
    }
}

/// Orders two components when they are comparable: numbers numerically
/// (across `Int`/`Real`), text lexicographically.
fn compare(a: &Item, b: &Item) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return x.partial_cmp(&y);
    }
    match (a.as_value(), b.as_value()) {
        (Some(Value::Text(x)), Some(Value::Text(y))) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Equality: numeric across `Int`/`Real`, structural otherwise.
#[must_use]
pub fn eq(a: &Item, b: &Item) -> bool {
    matches!(compare(a, b), Some(Ordering::Equal)) || a == b
}

/// Inequality.
#[must_use]
pub fn ne(a: &Item, b: &Item) -> bool {
    !eq(a, b)
}

/// Strictly greater.
#[must_use]
pub fn gt(a: &Item, b: &Item) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater))
}

/// Greater or equal.
#[must_use]
pub fn ge(a: &Item, b: &Item) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

/// Strictly less.
#[must_use]
pub fn lt(a: &Item, b: &Item) -> bool {
    matches!(compare(a, b), Some(Ordering::Less))
}

/// Less or equal.
#[must_use]
pub fn le(a: &Item, b: &Item) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}
