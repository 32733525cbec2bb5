// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mutation Builder
//!
//! Builds the parameterized write-request document for a command. The
//! document is built once per command and reused across every scenario
//! variant; only the variables change between submissions.
//!
//! # Document Shape
//!
//! ```text
//! mutation {Command}($a: String!, $b: Int) { {Command}(a: $a, b: $b) }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_command_harness::domain::{FieldSchema, FieldSpec, PrimitiveType};
//! use cim_command_harness::mutation::MutationBuilder;
//!
//! let schema = FieldSchema::new(vec![
//!     FieldSpec::required("fruit", PrimitiveType::String),
//! ]).unwrap();
//!
//! let document = MutationBuilder::new("OrderFruit")
//!     .schema(&schema)
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     document.text(),
//!     "mutation OrderFruit($fruit: String!) { OrderFruit(fruit: $fruit) }"
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::field::{validate_identifier, IdentifierError};
use crate::domain::{FieldSchema, PrimitiveType};
use crate::errors::SchemaError;
use crate::variables::InputSet;

/// One declared document parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: PrimitiveType,
    pub required: bool,
}

impl Parameter {
    fn declaration(&self) -> String {
        let bang = if self.required { "!" } else { "" };
        format!("${}: {}{}", self.name, self.field_type.document_name(), bang)
    }
}

/// Reusable write-request document naming its target command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationDocument {
    command: String,
    parameters: Vec<Parameter>,
    text: String,
}

impl MutationDocument {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Names in `input` that the document does not declare
    pub fn undeclared<'a>(&self, input: &'a InputSet) -> Vec<&'a str> {
        input
            .keys()
            .filter(|key| !self.parameters.iter().any(|p| p.name == *key))
            .collect()
    }
}

/// Builder for [`MutationDocument`]
///
/// Field name/type pairs are checked in [`MutationBuilder::build`], before
/// anything reaches a transport.
#[derive(Debug, Clone)]
pub struct MutationBuilder {
    command: String,
    parameters: Vec<Parameter>,
}

impl MutationBuilder {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameters: Vec::new(),
        }
    }

    /// Declare one parameter
    pub fn parameter(mut self, name: impl Into<String>, field_type: PrimitiveType, required: bool) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            field_type,
            required,
        });
        self
    }

    /// Declare every field of `schema`, in schema order
    pub fn schema(self, schema: &FieldSchema) -> Self {
        schema.fields().iter().fold(self, |builder, field| {
            builder.parameter(field.name.clone(), field.field_type, field.required)
        })
    }

    pub fn build(self) -> Result<MutationDocument, SchemaError> {
        if validate_identifier(&self.command).is_err() {
            return Err(SchemaError::InvalidCommandName(self.command));
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            validate_identifier(&parameter.name).map_err(|e| match e {
                IdentifierError::Empty => SchemaError::EmptyName,
                IdentifierError::Invalid => SchemaError::InvalidName(parameter.name.clone()),
            })?;
            if !seen.insert(parameter.name.as_str()) {
                return Err(SchemaError::DuplicateField(parameter.name.clone()));
            }
        }

        let text = render(&self.command, &self.parameters);
        Ok(MutationDocument {
            command: self.command,
            parameters: self.parameters,
            text,
        })
    }
}

fn render(command: &str, parameters: &[Parameter]) -> String {
    if parameters.is_empty() {
        return format!("mutation {command} {{ {command} }}");
    }

    let declarations = parameters
        .iter()
        .map(Parameter::declaration)
        .collect::<Vec<_>>()
        .join(", ");
    let arguments = parameters
        .iter()
        .map(|p| format!("{}: ${}", p.name, p.name))
        .collect::<Vec<_>>()
        .join(", ");

    format!("mutation {command}({declarations}) {{ {command}({arguments}) }}")
}
