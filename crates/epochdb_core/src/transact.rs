//! The transactor: compound operations that derive new snapshots.
//!
//! Every operation takes a snapshot and produces a fresh one; the input is
//! never touched. Index maintenance keeps the three permutation indices
//! consistent with storage: old paths are removed before new ones are
//! inserted, and emptied levels are pruned.

use crate::attr::{AttrName, Attribute, Cardinality, TypeTag};
use crate::datom::Datom;
use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::snapshot::Snapshot;
use crate::value::Value;

/// How an update combines the given value with the attribute's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    /// Replace (single cardinality) or union into the set (multiple).
    Add,
    /// Subtract from the set. Rejected for single-cardinality attributes.
    Remove,
    /// Replace the value or the entire set.
    ResetTo,
}

/// One operation inside a transact.
#[derive(Debug, Clone)]
pub enum Op {
    /// Add a new entity.
    Add(Entity),
    /// Update one attribute of an existing entity.
    Update {
        /// The entity to update.
        id: EntityId,
        /// The attribute to update.
        attr: AttrName,
        /// The value to combine with the current one.
        value: Value,
        /// How to combine it.
        op: UpdateOp,
    },
    /// Remove an entity and all its index paths.
    Remove(EntityId),
}

impl Op {
    /// Creates an add-entity operation.
    #[must_use]
    pub fn add(entity: Entity) -> Self {
        Op::Add(entity)
    }

    /// Creates an update operation.
    #[must_use]
    pub fn update(
        id: impl Into<EntityId>,
        attr: impl Into<AttrName>,
        value: impl Into<Value>,
        op: UpdateOp,
    ) -> Self {
        Op::Update {
            id: id.into(),
            attr: attr.into(),
            value: value.into(),
            op,
        }
    }

    /// Creates a remove-entity operation.
    #[must_use]
    pub fn remove(id: impl Into<EntityId>) -> Self {
        Op::Remove(id.into())
    }
}

impl Snapshot {
    /// Adds one entity, producing the next snapshot.
    pub fn with_entity(&self, entity: Entity) -> CoreResult<Snapshot> {
        self.apply(&[Op::Add(entity)])
    }

    /// Adds a batch of entities in one step, producing the next snapshot.
    pub fn with_entities(&self, entities: impl IntoIterator<Item = Entity>) -> CoreResult<Snapshot> {
        let ops: Vec<Op> = entities.into_iter().map(Op::Add).collect();
        self.apply(&ops)
    }

    /// Updates one attribute of an existing entity, producing the next
    /// snapshot.
    pub fn with_update(
        &self,
        id: impl Into<EntityId>,
        attr: impl Into<AttrName>,
        value: impl Into<Value>,
        op: UpdateOp,
    ) -> CoreResult<Snapshot> {
        self.apply(&[Op::update(id, attr, value, op)])
    }

    /// Removes an entity, producing the next snapshot. References other
    /// entities hold to the removed id are left dangling.
    pub fn without_entity(&self, id: impl Into<EntityId>) -> CoreResult<Snapshot> {
        self.apply(&[Op::Remove(id.into())])
    }

    /// Applies a sequence of operations as one logical step: the resulting
    /// snapshot's time is exactly one past this snapshot's, no matter how
    /// many operations run. Any error leaves this snapshot as the present.
    pub(crate) fn apply(&self, ops: &[Op]) -> CoreResult<Snapshot> {
        let mut next = self.clone();
        next.time = self.time + 1;
        for op in ops {
            match op {
                Op::Add(entity) => add_entity(&mut next, entity.clone())?,
                Op::Update {
                    id,
                    attr,
                    value,
                    op,
                } => update_entity(&mut next, id, attr, value.clone(), *op)?,
                Op::Remove(id) => remove_entity(&mut next, id)?,
            }
        }
        Ok(next)
    }
}

fn add_entity(next: &mut Snapshot, mut entity: Entity) -> CoreResult<()> {
    if entity.id().is_auto() {
        next.top_id += 1;
        entity.set_id(EntityId::new(format!("e{}", next.top_id)));
    }
    if next.storage.contains(entity.id()) {
        return Err(CoreError::duplicate_entity(entity.id().clone()));
    }

    let time = next.time;
    for attr in entity.attrs_mut() {
        normalize(attr)?;
        attr.stamp(None, time);
    }

    let id = entity.id().clone();
    for attr in entity.attrs() {
        if attr.is_indexed() {
            insert_value_paths(next, &id, attr.name(), attr.value());
        }
    }
    next.storage.insert(entity);
    Ok(())
}

fn update_entity(
    next: &mut Snapshot,
    id: &EntityId,
    name: &AttrName,
    value: Value,
    op: UpdateOp,
) -> CoreResult<()> {
    let time = next.time;

    let entity = next
        .storage
        .get(id)
        .ok_or_else(|| CoreError::unknown_entity(id.clone()))?;
    let attr = entity
        .attr(name)
        .ok_or_else(|| CoreError::unknown_attribute(id.clone(), name.clone()))?;
    check_value(name, attr.vtype(), attr.cardinality_of(), &value)?;

    let old_value = attr.value().clone();
    let old_ts = attr.curr_ts();
    let indexed = attr.is_indexed();
    let cardinality = attr.cardinality_of();

    let new_value = match (cardinality, op) {
        (Cardinality::Single, UpdateOp::Add | UpdateOp::ResetTo) => value,
        (Cardinality::Single, UpdateOp::Remove) => {
            return Err(CoreError::invalid_operation(format!(
                "remove on single-cardinality attribute {name}"
            )));
        }
        (Cardinality::Multiple, UpdateOp::Add) => {
            let mut set = old_value.as_set().cloned().unwrap_or_default();
            match value {
                Value::Set(members) => set.extend(members),
                v => {
                    set.insert(v);
                }
            }
            Value::Set(set)
        }
        (Cardinality::Multiple, UpdateOp::Remove) => {
            let mut set = old_value.as_set().cloned().unwrap_or_default();
            match &value {
                Value::Set(members) => {
                    for m in members {
                        set.remove(m);
                    }
                }
                v => {
                    set.remove(v);
                }
            }
            Value::Set(set)
        }
        (Cardinality::Multiple, UpdateOp::ResetTo) => match value {
            Value::Set(members) => Value::Set(members),
            v => Value::set([v]),
        },
    };

    if indexed {
        remove_value_paths(next, id, name, &old_value);
        insert_value_paths(next, id, name, &new_value);
    }

    let entity = next
        .storage
        .entry_mut(id)
        .ok_or_else(|| CoreError::unknown_entity(id.clone()))?;
    let attr = entity
        .attr_mut(name)
        .ok_or_else(|| CoreError::unknown_attribute(id.clone(), name.clone()))?;
    attr.set_value(new_value);
    attr.stamp(Some(old_ts), time);
    Ok(())
}

fn remove_entity(next: &mut Snapshot, id: &EntityId) -> CoreResult<()> {
    let entity = next
        .storage
        .remove(id)
        .ok_or_else(|| CoreError::unknown_entity(id.clone()))?;
    for attr in entity.attrs() {
        if attr.is_indexed() {
            remove_value_paths(next, id, attr.name(), attr.value());
        }
    }
    Ok(())
}

/// Validates a candidate value against an attribute's declared type and
/// cardinality. A set conforms for a multi-cardinality attribute when every
/// member conforms; single-cardinality attributes never accept sets.
fn check_value(
    name: &AttrName,
    vtype: TypeTag,
    cardinality: Cardinality,
    value: &Value,
) -> CoreResult<()> {
    let ok = match (cardinality, value) {
        (Cardinality::Multiple, Value::Set(members)) => members.iter().all(|m| vtype.matches(m)),
        (_, v) => vtype.matches(v),
    };
    if ok {
        Ok(())
    } else {
        Err(CoreError::type_mismatch(name.clone(), vtype, value.kind()))
    }
}

/// Type-checks a freshly added attribute and wraps a bare multi-cardinality
/// value into a singleton set.
fn normalize(attr: &mut Attribute) -> CoreResult<()> {
    if attr.cardinality_of() == Cardinality::Multiple && !attr.value().is_set() {
        let v = attr.value().clone();
        attr.set_value(Value::set([v]));
    }
    check_value(
        attr.name(),
        attr.vtype(),
        attr.cardinality_of(),
        attr.value(),
    )
}

fn insert_value_paths(next: &mut Snapshot, id: &EntityId, name: &AttrName, value: &Value) {
    for_each_member(value, |v| {
        let datom = Datom::new(id.clone(), name.clone(), v.clone());
        next.eavt.insert(datom.clone());
        next.avet.insert(datom.clone());
        next.veat.insert(datom);
    });
}

fn remove_value_paths(next: &mut Snapshot, id: &EntityId, name: &AttrName, value: &Value) {
    for_each_member(value, |v| {
        let datom = Datom::new(id.clone(), name.clone(), v.clone());
        next.eavt.remove(datom.clone());
        next.avet.remove(datom.clone());
        next.veat.remove(datom);
    });
}

fn for_each_member(value: &Value, mut f: impl FnMut(&Value)) {
    match value {
        Value::Set(members) => {
            for v in members {
                f(v);
            }
        }
        v => f(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Permutation;

    fn patient(id: &str, city: &str) -> Entity {
        Entity::new(id)
            .with_attr(Attribute::new("patient/city", city, TypeTag::String).indexed(true))
            .with_attr(
                Attribute::new("patient/symptoms", Value::set(["fever", "cough"]), TypeTag::String)
                    .indexed(true)
                    .cardinality(Cardinality::Multiple),
            )
            .with_attr(Attribute::new("patient/note", "walk-in", TypeTag::String))
    }

    fn paths(snap: &Snapshot) -> usize {
        snap.index(Permutation::Eavt).len()
    }

    #[test]
    fn add_entity_stamps_and_indexes() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        assert_eq!(snap.time(), 1);

        let city = snap.attr(&"pat1".into(), &"patient/city".into()).unwrap();
        assert_eq!(city.curr_ts(), 1);
        assert_eq!(city.prev_ts(), None);

        // city + two symptoms are indexed; the note is not.
        for perm in [Permutation::Eavt, Permutation::Avet, Permutation::Veat] {
            assert_eq!(snap.index(perm).len(), 3);
            assert!(snap
                .index(perm)
                .contains(&Datom::new("pat1", "patient/city", "London")));
        }
    }

    #[test]
    fn duplicate_entity_is_rejected() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let err = snap.with_entity(patient("pat1", "Paris")).unwrap_err();
        assert_eq!(err, CoreError::duplicate_entity("pat1".into()));
    }

    #[test]
    fn auto_id_assignment() {
        let snap = Snapshot::empty()
            .with_entities([Entity::auto(), Entity::auto()])
            .unwrap();
        assert!(snap.entity(&"e1".into()).is_some());
        assert!(snap.entity(&"e2".into()).is_some());
        assert_eq!(snap.time(), 1);
    }

    #[test]
    fn add_entity_type_mismatch() {
        let bad = Entity::new("pat9")
            .with_attr(Attribute::new("patient/city", 42i64, TypeTag::String));
        let err = Snapshot::empty().with_entity(bad).unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { .. }));
    }

    #[test]
    fn bare_multi_value_is_wrapped() {
        let e = Entity::new("pat1").with_attr(
            Attribute::new("patient/symptoms", "fever", TypeTag::String)
                .cardinality(Cardinality::Multiple),
        );
        let snap = Snapshot::empty().with_entity(e).unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["fever"]));
    }

    #[test]
    fn single_update_replaces_and_stamps() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap
            .with_update("pat1", "patient/city", "Paris", UpdateOp::Add)
            .unwrap();

        let city = snap.attr(&"pat1".into(), &"patient/city".into()).unwrap();
        assert_eq!(city.value(), &Value::from("Paris"));
        assert_eq!(city.prev_ts(), Some(1));
        assert_eq!(city.curr_ts(), 2);

        // The old path is gone from every index, the new one present.
        for perm in [Permutation::Eavt, Permutation::Avet, Permutation::Veat] {
            assert!(!snap
                .index(perm)
                .contains(&Datom::new("pat1", "patient/city", "London")));
            assert!(snap
                .index(perm)
                .contains(&Datom::new("pat1", "patient/city", "Paris")));
        }
    }

    #[test]
    fn single_remove_is_invalid() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let err = snap
            .with_update("pat1", "patient/city", "London", UpdateOp::Remove)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
    }

    #[test]
    fn multi_add_unions() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap
            .with_update("pat1", "patient/symptoms", "sneeze", UpdateOp::Add)
            .unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["fever", "cough", "sneeze"]));
        assert_eq!(paths(&snap), 4);
    }

    #[test]
    fn multi_add_present_member_keeps_set() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap
            .with_update("pat1", "patient/symptoms", "fever", UpdateOp::Add)
            .unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["fever", "cough"]));
        assert_eq!(paths(&snap), 3);
    }

    #[test]
    fn multi_remove_subtracts_and_tolerates_absent() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap
            .with_update("pat1", "patient/symptoms", "fever", UpdateOp::Remove)
            .unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["cough"]));

        // Removing a non-member is a no-op, not an error.
        let snap = snap
            .with_update("pat1", "patient/symptoms", "hiccups", UpdateOp::Remove)
            .unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["cough"]));
    }

    #[test]
    fn multi_reset_replaces_whole_set() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap
            .with_update(
                "pat1",
                "patient/symptoms",
                Value::set(["cold-sweat", "sneeze"]),
                UpdateOp::ResetTo,
            )
            .unwrap();
        let v = snap.value_of(&"pat1".into(), &"patient/symptoms".into()).unwrap();
        assert_eq!(v, &Value::set(["cold-sweat", "sneeze"]));

        for perm in [Permutation::Eavt, Permutation::Avet, Permutation::Veat] {
            assert!(!snap
                .index(perm)
                .contains(&Datom::new("pat1", "patient/symptoms", "fever")));
        }
    }

    #[test]
    fn update_unknown_entity_and_attribute() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let err = snap
            .with_update("ghost", "patient/city", "Paris", UpdateOp::Add)
            .unwrap_err();
        assert_eq!(err, CoreError::unknown_entity("ghost".into()));

        let err = snap
            .with_update("pat1", "patient/weight", 70i64, UpdateOp::Add)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::unknown_attribute("pat1".into(), "patient/weight".into())
        );
    }

    #[test]
    fn update_type_mismatch() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let err = snap
            .with_update("pat1", "patient/city", true, UpdateOp::Add)
            .unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { .. }));
    }

    #[test]
    fn non_indexed_update_leaves_indices_alone() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let before = paths(&snap);
        let snap = snap
            .with_update("pat1", "patient/note", "follow-up", UpdateOp::ResetTo)
            .unwrap();
        assert_eq!(paths(&snap), before);
    }

    #[test]
    fn remove_entity_clears_storage_and_paths() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let snap = snap.without_entity("pat1").unwrap();

        assert!(snap.storage().is_empty());
        for perm in [Permutation::Eavt, Permutation::Avet, Permutation::Veat] {
            assert!(snap.index(perm).is_empty());
        }

        let err = snap.without_entity("pat1").unwrap_err();
        assert_eq!(err, CoreError::unknown_entity("pat1".into()));
    }

    #[test]
    fn removing_a_referenced_entity_leaves_danglers() {
        let snap = Snapshot::empty()
            .with_entities([
                patient("pat1", "London"),
                Entity::new("t1").with_attr(
                    Attribute::new("test/patient", Value::Ref("pat1".into()), TypeTag::Ref)
                        .indexed(true),
                ),
            ])
            .unwrap();
        let snap = snap.without_entity("pat1").unwrap();

        // t1 still points at the removed id.
        let v = snap.value_of(&"t1".into(), &"test/patient".into()).unwrap();
        assert_eq!(v, &Value::Ref("pat1".into()));
    }

    #[test]
    fn batch_is_one_logical_step() {
        let snap = Snapshot::empty()
            .with_entities([patient("pat1", "London"), patient("pat2", "Rome")])
            .unwrap();
        assert_eq!(snap.time(), 1);
        for id in ["pat1", "pat2"] {
            let city = snap.attr(&id.into(), &"patient/city".into()).unwrap();
            assert_eq!(city.curr_ts(), 1);
        }
    }

    #[test]
    fn failed_op_leaves_input_usable() {
        let snap = Snapshot::empty().with_entity(patient("pat1", "London")).unwrap();
        let before = snap.clone();
        assert!(snap.with_entity(patient("pat1", "Paris")).is_err());
        // The input snapshot is untouched by the failed derivation.
        assert_eq!(snap.time(), before.time());
        assert_eq!(paths(&snap), paths(&before));
    }
}
