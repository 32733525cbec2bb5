// Copyright (c) 2025 - Cowboy AI, Inc.
//! Expected Effects of a Command
//!
//! Causal claims a scenario verifies after submission: an event is durably
//! recorded ([`ExpectedEvent`]) or a read model changes ([`ExpectedWork`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::variables::InputSet;

/// Logical read-model or event-stream name used to key queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTag(String);

impl EntityTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// What the read model must show once a command's work has landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum WorkExpectation {
    /// At least one matching record
    Exists,
    /// No matching record
    Absent,
    /// Some record's serialized value contains every literal
    ContainsValues(Vec<String>),
}

/// Submitting `triggering_input` must change the read model behind `observed_through`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedWork {
    pub description: String,
    pub triggering_input: InputSet,
    pub observed_through: EntityTag,
    /// `None` is an authoring mistake and fails the scenario loudly
    pub expectation: Option<WorkExpectation>,
}

impl ExpectedWork {
    pub fn new(
        description: impl Into<String>,
        triggering_input: InputSet,
        observed_through: impl Into<EntityTag>,
        expectation: WorkExpectation,
    ) -> Self {
        Self {
            description: description.into(),
            triggering_input,
            observed_through: observed_through.into(),
            expectation: Some(expectation),
        }
    }
}

/// Submitting `triggering_input` must durably record an event named `event_name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedEvent {
    pub triggering_input: InputSet,
    pub event_name: String,
    pub observed_through: EntityTag,
}

impl ExpectedEvent {
    pub fn new(
        triggering_input: InputSet,
        event_name: impl Into<String>,
        observed_through: impl Into<EntityTag>,
    ) -> Self {
        Self {
            triggering_input,
            event_name: event_name.into(),
            observed_through: observed_through.into(),
        }
    }
}
