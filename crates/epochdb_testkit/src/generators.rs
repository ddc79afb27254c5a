//! Property-based test generators using proptest.
//!
//! Strategies generate well-formed data: attribute values always conform to
//! their declared type, multi-cardinality attributes carry sets, and entity
//! batches have distinct ids. Reference values may dangle, which the engine
//! allows.

use epochdb_core::{Attribute, AttrName, Cardinality, Entity, EntityId, TypeTag, Value};
use proptest::prelude::*;

/// Strategy for short symbolic entity ids.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    "[a-z][a-z0-9]{0,6}".prop_map(EntityId::from)
}

/// Strategy for namespaced attribute names.
pub fn attr_name_strategy() -> impl Strategy<Value = AttrName> {
    "[a-z]{1,8}/[a-z]{1,8}".prop_map(AttrName::from)
}

/// Strategy for a scalar value conforming to the given type.
pub fn scalar_strategy(tag: TypeTag) -> BoxedStrategy<Value> {
    match tag {
        TypeTag::String => "[a-z]{0,6}".prop_map(Value::from).boxed(),
        TypeTag::Number => prop_oneof![
            any::<i64>().prop_map(Value::Int),
            (-1.0e6..1.0e6f64).prop_map(Value::Real),
        ]
        .boxed(),
        TypeTag::Boolean => any::<bool>().prop_map(Value::Bool).boxed(),
        TypeTag::Ref => entity_id_strategy().prop_map(Value::Ref).boxed(),
    }
}

fn type_tag_strategy() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        Just(TypeTag::String),
        Just(TypeTag::Number),
        Just(TypeTag::Boolean),
        Just(TypeTag::Ref),
    ]
}

/// Strategy for `(type, value, indexed, cardinality)` attribute payloads.
pub fn attr_payload_strategy() -> impl Strategy<Value = (TypeTag, Value, bool, Cardinality)> {
    (
        type_tag_strategy(),
        any::<bool>(),
        prop_oneof![Just(Cardinality::Single), Just(Cardinality::Multiple)],
    )
        .prop_flat_map(|(tag, indexed, cardinality)| {
            let value = match cardinality {
                Cardinality::Single => scalar_strategy(tag),
                Cardinality::Multiple => prop::collection::btree_set(scalar_strategy(tag), 1..4)
                    .prop_map(Value::Set)
                    .boxed(),
            };
            value.prop_map(move |v| (tag, v, indexed, cardinality))
        })
}

/// Strategy for a well-formed attribute with the given name.
pub fn attribute_strategy(name: AttrName) -> impl Strategy<Value = Attribute> {
    attr_payload_strategy().prop_map(move |(tag, value, indexed, cardinality)| {
        Attribute::new(name.clone(), value, tag)
            .indexed(indexed)
            .cardinality(cardinality)
    })
}

/// Strategy for a batch of entities with distinct ids, each carrying one to
/// three well-formed attributes.
pub fn entities_strategy(max_entities: usize) -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_map(
        entity_id_strategy(),
        prop::collection::btree_map(attr_name_strategy(), attr_payload_strategy(), 1..4),
        1..=max_entities,
    )
    .prop_map(|batch| {
        batch
            .into_iter()
            .map(|(id, attrs)| {
                attrs
                    .into_iter()
                    .fold(Entity::new(id), |entity, (name, (tag, value, indexed, cardinality))| {
                        entity.with_attr(
                            Attribute::new(name, value, tag)
                                .indexed(indexed)
                                .cardinality(cardinality),
                        )
                    })
            })
            .collect()
    })
}
