//! Test fixtures: the clinic demo dataset.
//!
//! Two patients in London, two measurement machines, and three blood
//! pressure readings referencing them. The dataset is committed in three
//! transacts (patients, machines, readings), so fixtures start with a
//! four-snapshot history.

use epochdb_core::{
    Attribute, Cardinality, Connection, Entity, Op, TypeTag, Value,
};

/// Builds a patient entity: an indexed city, an indexed multi-valued
/// symptom set, and an (initially empty) indexed set of test references.
pub fn patient<'a>(id: &str, city: &str, symptoms: impl IntoIterator<Item = &'a str>) -> Entity {
    Entity::new(id)
        .with_attr(Attribute::new("patient/city", city, TypeTag::String).indexed(true))
        .with_attr(
            Attribute::new("patient/symptoms", Value::set(symptoms), TypeTag::String)
                .indexed(true)
                .cardinality(Cardinality::Multiple),
        )
        .with_attr(
            Attribute::new("patient/tests", Value::set(std::iter::empty::<Value>()), TypeTag::Ref)
                .indexed(true)
                .cardinality(Cardinality::Multiple),
        )
}

/// Builds a measurement machine entity.
pub fn machine(id: &str, model: &str) -> Entity {
    Entity::new(id)
        .with_attr(Attribute::new("machine/model", model, TypeTag::String).indexed(true))
}

/// Builds a blood pressure reading referencing its patient and machine.
pub fn bp_test(id: &str, systolic: i64, diastolic: i64, patient: &str, machine: &str) -> Entity {
    Entity::new(id)
        .with_attr(Attribute::new("test/bp-systolic", systolic, TypeTag::Number).indexed(true))
        .with_attr(Attribute::new("test/bp-diastolic", diastolic, TypeTag::Number).indexed(true))
        .with_attr(
            Attribute::new("test/patient", Value::Ref(patient.into()), TypeTag::Ref).indexed(true),
        )
        .with_attr(
            Attribute::new("test/machine", Value::Ref(machine.into()), TypeTag::Ref).indexed(true),
        )
}

/// A fresh, unregistered connection holding the clinic dataset.
pub fn clinic() -> Connection {
    let conn = Connection::new("clinic");
    conn.transact(&[
        Op::add(patient("pat1", "London", ["fever", "cough"])),
        Op::add(patient("pat2", "London", ["fever", "cough"])),
    ])
    .expect("failed to add patients");
    conn.transact(&[
        Op::add(machine("mac1", "Accu-Chek IV")),
        Op::add(machine("mac2", "Respironics G3")),
    ])
    .expect("failed to add machines");
    conn.transact(&[
        Op::add(bp_test("t2-pat1", 170, 80, "pat1", "mac1")),
        Op::add(bp_test("t4-pat2", 170, 90, "pat2", "mac2")),
        Op::add(bp_test("t3-pat2", 140, 80, "pat2", "mac1")),
    ])
    .expect("failed to add readings");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinic_has_three_commits() {
        let conn = clinic();
        assert_eq!(conn.len(), 4);
        assert_eq!(conn.snapshot().time(), 3);
        assert_eq!(conn.snapshot().storage().len(), 7);
    }

    #[test]
    fn readings_reference_their_patients() {
        let conn = clinic();
        let snap = conn.snapshot();
        let v = snap
            .value_of(&"t3-pat2".into(), &"test/patient".into())
            .unwrap();
        assert_eq!(v, &Value::Ref("pat2".into()));
    }
}
