// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Variable Set Derivation
//!
//! For arbitrary valid schemas, the four variants must cover exactly the
//! right keys, and their values must have (or deliberately lack) each
//! field's declared runtime shape.

use cim_command_harness::domain::{FieldSchema, FieldSpec, PrimitiveType};
use cim_command_harness::mutation::MutationBuilder;
use cim_command_harness::variables::{Variant, VariableSets};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn type_strategy() -> impl Strategy<Value = PrimitiveType> {
    prop_oneof![
        Just(PrimitiveType::String),
        Just(PrimitiveType::Id),
        Just(PrimitiveType::Int),
        Just(PrimitiveType::Float),
        Just(PrimitiveType::Boolean),
    ]
}

/// Schemas of 0-8 uniquely named fields
fn schema_strategy() -> impl Strategy<Value = FieldSchema> {
    prop::collection::btree_map(
        "[a-z_][a-zA-Z0-9_]{0,10}",
        (type_strategy(), any::<bool>()),
        0..8,
    )
    .prop_map(|fields: BTreeMap<String, (PrimitiveType, bool)>| {
        FieldSchema::new(fields.into_iter().map(|(name, (field_type, required))| {
            if required {
                FieldSpec::required(name, field_type)
            } else {
                FieldSpec::optional(name, field_type)
            }
        }))
        .expect("generated schema must be valid")
    })
}

fn names<'a>(fields: impl Iterator<Item = &'a FieldSpec>) -> BTreeSet<String> {
    fields.map(|f| f.name.clone()).collect()
}

proptest! {
    /// Property: All, Empty and InvalidType carry every field; RequiredOnly only required ones
    #[test]
    fn prop_key_coverage(schema in schema_strategy()) {
        let sets = VariableSets::derive(&schema);
        let every = names(schema.fields().iter());
        let required = names(schema.required_fields());

        for variant in [Variant::All, Variant::Empty, Variant::InvalidType] {
            let keys: BTreeSet<String> = sets.get(variant).keys().map(str::to_string).collect();
            prop_assert_eq!(&keys, &every, "{} keys", variant);
        }
        let keys: BTreeSet<String> = sets.required_only.keys().map(str::to_string).collect();
        prop_assert_eq!(keys, required);
    }

    /// Property: Valid and empty values match the declared type; invalid values never do
    #[test]
    fn prop_value_shapes(schema in schema_strategy()) {
        let sets = VariableSets::derive(&schema);

        for field in schema.fields() {
            let ty = field.field_type;
            prop_assert!(ty.accepts(sets.all.get(&field.name).unwrap()));
            prop_assert!(ty.accepts(sets.empty.get(&field.name).unwrap()));
            prop_assert!(!ty.accepts(sets.invalid_type.get(&field.name).unwrap()));
        }
    }

    /// Property: Derivation is a pure function of the schema
    #[test]
    fn prop_derivation_is_deterministic(schema in schema_strategy()) {
        prop_assert_eq!(VariableSets::derive(&schema), VariableSets::derive(&schema));
    }

    /// Property: The mutation document declares every key of every variant
    #[test]
    fn prop_document_declares_all_variant_keys(schema in schema_strategy()) {
        let document = MutationBuilder::new("OrderFruit").schema(&schema).build().unwrap();
        let sets = VariableSets::derive(&schema);

        prop_assert_eq!(document.parameters().len(), schema.len());
        for variant in [Variant::All, Variant::RequiredOnly, Variant::Empty, Variant::InvalidType] {
            prop_assert!(document.undeclared(sets.get(variant)).is_empty());
        }
    }
}
