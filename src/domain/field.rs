// Copyright (c) 2025 - Cowboy AI, Inc.
//! Field Schema Value Objects with Construction Invariants
//!
//! A [`FieldSchema`] describes every input a command accepts. All invariants
//! are enforced when the schema is built so a malformed schema fails before
//! any request reaches the backend.
//!
//! # Invariants
//!
//! - Field names are non-empty identifiers (`[A-Za-z_][A-Za-z0-9_]*`)
//! - Field names are unique within a schema
//! - A `valid_example`, when given, parses as the declared type

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::fmt;

use crate::errors::SchemaError;

/// Closed set of primitive input types a command field may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// UTF-8 text
    String,
    /// Opaque identifier carried as text
    Id,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// true / false
    Boolean,
}

impl PrimitiveType {
    /// Type name as it appears in a request document
    pub fn document_name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Id => "ID",
            PrimitiveType::Int => "Int",
            PrimitiveType::Float => "Float",
            PrimitiveType::Boolean => "Boolean",
        }
    }

    /// A value that satisfies the type and carries content
    pub fn placeholder(&self) -> Value {
        match self {
            PrimitiveType::String => Value::String("example".to_string()),
            PrimitiveType::Id => Value::String("00000000-0000-0000-0000-000000000001".to_string()),
            PrimitiveType::Int => Value::from(1),
            PrimitiveType::Float => Value::from(1.5),
            PrimitiveType::Boolean => Value::Bool(true),
        }
    }

    /// The vacuous value of the type
    pub fn empty_value(&self) -> Value {
        match self {
            PrimitiveType::String | PrimitiveType::Id => Value::String(String::new()),
            PrimitiveType::Int => Value::from(0),
            PrimitiveType::Float => Value::from(0.0),
            PrimitiveType::Boolean => Value::Bool(false),
        }
    }

    /// A value whose JSON type never matches the declared type
    pub fn invalid_value(&self) -> Value {
        match self {
            PrimitiveType::String => Value::from(123),
            PrimitiveType::Id => Value::Bool(true),
            PrimitiveType::Int | PrimitiveType::Float => {
                Value::String("not-a-number".to_string())
            }
            PrimitiveType::Boolean => Value::String("not-a-boolean".to_string()),
        }
    }

    /// Check whether a JSON value has this type's runtime shape
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String | PrimitiveType::Id => value.is_string(),
            PrimitiveType::Int => value.is_i64() || value.is_u64(),
            PrimitiveType::Float => value.is_number(),
            PrimitiveType::Boolean => value.is_boolean(),
        }
    }

    /// Parse a textual example into a JSON value of this type
    pub fn parse_example(&self, example: &str) -> Option<Value> {
        match self {
            PrimitiveType::String | PrimitiveType::Id => Some(Value::String(example.to_string())),
            PrimitiveType::Int => example.trim().parse::<i64>().ok().map(Value::from),
            PrimitiveType::Float => example
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            PrimitiveType::Boolean => example.trim().parse::<bool>().ok().map(Value::Bool),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document_name())
    }
}

/// One accepted command input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: PrimitiveType,

    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_example: Option<String>,
}

impl FieldSpec {
    /// Required field with no example
    pub fn required(name: impl Into<String>, field_type: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            valid_example: None,
        }
    }

    /// Optional field with no example
    pub fn optional(name: impl Into<String>, field_type: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            valid_example: None,
        }
    }

    /// Attach a known-good example value
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.valid_example = Some(example.into());
        self
    }

    /// The value used when the field must be present and valid
    ///
    /// Uses `valid_example` when given, otherwise the type placeholder.
    pub fn valid_value(&self) -> Value {
        self.valid_example
            .as_deref()
            .and_then(|example| self.field_type.parse_example(example))
            .unwrap_or_else(|| self.field_type.placeholder())
    }
}

/// Ordered, validated set of command inputs
///
/// Declaration order is preserved; it drives parameter order in request
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSchema(Vec<FieldSpec>);

impl FieldSchema {
    /// Build a schema, enforcing all field invariants
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Result<Self, SchemaError> {
        let fields: Vec<FieldSpec> = fields.into_iter().collect();
        let mut seen = HashSet::new();

        for field in &fields {
            validate_identifier(&field.name).map_err(|e| match e {
                IdentifierError::Empty => SchemaError::EmptyName,
                IdentifierError::Invalid => SchemaError::InvalidName(field.name.clone()),
            })?;

            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }

            if let Some(example) = &field.valid_example {
                if field.field_type.parse_example(example).is_none() {
                    return Err(SchemaError::InvalidExample {
                        field: field.name.clone(),
                        example: example.clone(),
                        expected: field.field_type.to_string(),
                    });
                }
            }
        }

        Ok(Self(fields))
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.0.iter().filter(|f| f.required)
    }

    pub fn has_required_fields(&self) -> bool {
        self.0.iter().any(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FieldSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = Vec::<FieldSpec>::deserialize(deserializer)?;
        FieldSchema::new(fields).map_err(serde::de::Error::custom)
    }
}

pub(crate) enum IdentifierError {
    Empty,
    Invalid,
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(IdentifierError::Empty)?;

    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(IdentifierError::Invalid);
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(IdentifierError::Invalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_schema_preserves_order() {
        let schema = FieldSchema::new(vec![
            FieldSpec::required("fruit", PrimitiveType::String),
            FieldSpec::optional("count", PrimitiveType::Int),
        ])
        .unwrap();

        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["fruit", "count"]);
        assert!(schema.has_required_fields());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = FieldSchema::new(vec![
            FieldSpec::required("fruit", PrimitiveType::String),
            FieldSpec::optional("fruit", PrimitiveType::Int),
        ]);
        assert_eq!(result, Err(SchemaError::DuplicateField("fruit".to_string())));
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert_eq!(
            FieldSchema::new(vec![FieldSpec::required("", PrimitiveType::String)]),
            Err(SchemaError::EmptyName)
        );
        assert!(matches!(
            FieldSchema::new(vec![FieldSpec::required("1fruit", PrimitiveType::String)]),
            Err(SchemaError::InvalidName(_))
        ));
        assert!(matches!(
            FieldSchema::new(vec![FieldSpec::required("fruit-name", PrimitiveType::String)]),
            Err(SchemaError::InvalidName(_))
        ));
    }

    #[test]
    fn test_example_must_parse_as_declared_type() {
        let result = FieldSchema::new(vec![
            FieldSpec::required("count", PrimitiveType::Int).with_example("many"),
        ]);
        assert!(matches!(result, Err(SchemaError::InvalidExample { .. })));

        let schema = FieldSchema::new(vec![
            FieldSpec::required("count", PrimitiveType::Int).with_example("42"),
        ])
        .unwrap();
        assert_eq!(schema.fields()[0].valid_value(), json!(42));
    }

    #[test]
    fn test_invalid_value_never_accepted_by_its_type() {
        for ty in [
            PrimitiveType::String,
            PrimitiveType::Id,
            PrimitiveType::Int,
            PrimitiveType::Float,
            PrimitiveType::Boolean,
        ] {
            assert!(ty.accepts(&ty.placeholder()), "{ty} placeholder");
            assert!(ty.accepts(&ty.empty_value()), "{ty} empty");
            assert!(!ty.accepts(&ty.invalid_value()), "{ty} invalid");
        }
    }

    #[test]
    fn test_schema_deserialization_enforces_invariants() {
        let ok: FieldSchema = serde_json::from_value(json!([
            {"name": "fruit", "type": "string", "required": true}
        ]))
        .unwrap();
        assert_eq!(ok.len(), 1);

        let dup = serde_json::from_value::<FieldSchema>(json!([
            {"name": "fruit", "type": "string", "required": true},
            {"name": "fruit", "type": "int", "required": false}
        ]));
        assert!(dup.is_err());
    }
}
