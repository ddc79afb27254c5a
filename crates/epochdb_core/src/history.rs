//! Attribute evolution across a connection's history.

use crate::attr::{AttrName, Attribute};
use crate::entity::EntityId;
use crate::snapshot::Snapshot;
use std::sync::Arc;

/// Reconstructs how one attribute of one entity evolved, oldest first.
///
/// Returns one `(snapshot time, attribute version)` pair per snapshot in
/// which the attribute version changed. The walk starts at the newest
/// snapshot of the given history and follows each version's `prev_ts`
/// pointer until it reaches the first version; a missing entity or
/// attribute at any point simply ends the walk.
pub fn evolution_of(
    history: &[Arc<Snapshot>],
    id: &EntityId,
    attr: &AttrName,
) -> Vec<(u64, Attribute)> {
    let mut versions = Vec::new();
    let mut cursor = history.len().checked_sub(1);
    while let Some(pos) = cursor {
        let Some(version) = history.get(pos).and_then(|snap| snap.attr(id, attr)) else {
            break;
        };
        versions.push((version.curr_ts(), version.clone()));
        // prev_ts indices are strictly decreasing; anything else would loop.
        cursor = match version.prev_ts() {
            Some(prev) if (prev as usize) < pos => Some(prev as usize),
            _ => None,
        };
    }
    versions.reverse();
    versions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Cardinality, TypeTag};
    use crate::connection::Connection;
    use crate::entity::Entity;
    use crate::transact::{Op, UpdateOp};
    use crate::value::Value;

    fn conn_with_city() -> Connection {
        let conn = Connection::new("evolution");
        conn.transact(&[Op::add(Entity::new("pat1").with_attr(
            crate::attr::Attribute::new("patient/city", "London", TypeTag::String).indexed(true),
        ))])
        .unwrap();
        conn
    }

    #[test]
    fn single_version() {
        let conn = conn_with_city();
        let history = conn.history();
        let evo = evolution_of(&history, &"pat1".into(), &"patient/city".into());
        assert_eq!(evo.len(), 1);
        assert_eq!(evo[0].0, 1);
        assert_eq!(evo[0].1.value(), &Value::from("London"));
    }

    #[test]
    fn versions_come_back_oldest_first() {
        let conn = conn_with_city();
        conn.transact(&[Op::update("pat1", "patient/city", "Paris", UpdateOp::Add)])
            .unwrap();
        conn.transact(&[Op::update("pat1", "patient/city", "Rome", UpdateOp::Add)])
            .unwrap();

        let history = conn.history();
        let evo = evolution_of(&history, &"pat1".into(), &"patient/city".into());
        let cities: Vec<_> = evo.iter().map(|(_, a)| a.value().clone()).collect();
        assert_eq!(
            cities,
            vec![
                Value::from("London"),
                Value::from("Paris"),
                Value::from("Rome")
            ]
        );
        assert_eq!(
            evo.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn unrelated_transacts_add_no_versions() {
        let conn = conn_with_city();
        conn.transact(&[Op::add(Entity::new("pat2").with_attr(
            crate::attr::Attribute::new("patient/city", "Rome", TypeTag::String),
        ))])
        .unwrap();

        let history = conn.history();
        let evo = evolution_of(&history, &"pat1".into(), &"patient/city".into());
        assert_eq!(evo.len(), 1);
    }

    #[test]
    fn multi_cardinality_versions() {
        let conn = Connection::new("evolution-multi");
        conn.transact(&[Op::add(Entity::new("pat1").with_attr(
            crate::attr::Attribute::new(
                "patient/symptoms",
                Value::set(["fever", "cough"]),
                TypeTag::String,
            )
            .indexed(true)
            .cardinality(Cardinality::Multiple),
        ))])
        .unwrap();
        conn.transact(&[Op::update(
            "pat1",
            "patient/symptoms",
            Value::set(["cold-sweat", "sneeze"]),
            UpdateOp::ResetTo,
        )])
        .unwrap();

        let history = conn.history();
        let evo = evolution_of(&history, &"pat1".into(), &"patient/symptoms".into());
        assert_eq!(evo.len(), 2);
        assert_eq!(evo[0].1.value(), &Value::set(["fever", "cough"]));
        assert_eq!(evo[1].1.value(), &Value::set(["cold-sweat", "sneeze"]));
    }

    #[test]
    fn missing_entity_or_attribute_is_empty() {
        let conn = conn_with_city();
        let history = conn.history();
        assert!(evolution_of(&history, &"ghost".into(), &"patient/city".into()).is_empty());
        assert!(evolution_of(&history, &"pat1".into(), &"patient/age".into()).is_empty());
    }

    #[test]
    fn removed_entity_has_no_evolution_at_present() {
        let conn = conn_with_city();
        conn.transact(&[Op::remove("pat1")]).unwrap();
        let history = conn.history();
        assert!(evolution_of(&history, &"pat1".into(), &"patient/city".into()).is_empty());
    }
}
