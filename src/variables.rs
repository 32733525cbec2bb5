// Copyright (c) 2025 - Cowboy AI, Inc.
//! Variable Set Generator
//!
//! Derives the four canonical input variants from a [`FieldSchema`]. This is
//! a pure function of the schema: no I/O, no randomness, no time.
//!
//! | Variant | Keys | Values |
//! |---|---|---|
//! | `All` | every field | example or placeholder |
//! | `RequiredOnly` | required fields | example or placeholder |
//! | `Empty` | every field | empty/zero value of the type |
//! | `InvalidType` | every field | value of a mismatching type |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{FieldSchema, FieldSpec};

/// Concrete values keyed by field name, as submitted with a command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSet(BTreeMap<String, Value>);

impl InputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object form for transport payloads
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for InputSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which canonical variant an input set represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    All,
    RequiredOnly,
    Empty,
    InvalidType,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::All => "all",
            Variant::RequiredOnly => "required-only",
            Variant::Empty => "empty",
            Variant::InvalidType => "invalid-type",
        };
        f.write_str(name)
    }
}

/// The four variants derived from one schema
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSets {
    pub all: InputSet,
    pub required_only: InputSet,
    pub empty: InputSet,
    pub invalid_type: InputSet,
}

impl VariableSets {
    /// Derive every variant from `schema`
    pub fn derive(schema: &FieldSchema) -> Self {
        let fields = schema.fields();
        Self {
            all: collect(fields.iter(), FieldSpec::valid_value),
            required_only: collect(fields.iter().filter(|f| f.required), FieldSpec::valid_value),
            empty: collect(fields.iter(), |f| f.field_type.empty_value()),
            invalid_type: collect(fields.iter(), |f| f.field_type.invalid_value()),
        }
    }

    pub fn get(&self, variant: Variant) -> &InputSet {
        match variant {
            Variant::All => &self.all,
            Variant::RequiredOnly => &self.required_only,
            Variant::Empty => &self.empty,
            Variant::InvalidType => &self.invalid_type,
        }
    }
}

fn collect<'a>(
    fields: impl Iterator<Item = &'a FieldSpec>,
    value_for: impl Fn(&FieldSpec) -> Value,
) -> InputSet {
    fields.map(|f| (f.name.clone(), value_for(f))).collect()
}
