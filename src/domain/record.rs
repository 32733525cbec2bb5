// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read/Event Store Record Shape

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind tag carried by every record a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Current read-model state of an entity
    Snapshot,
    /// Durably recorded domain event
    Event,
    /// Any kind this harness does not interpret
    #[serde(other)]
    Other,
}

impl RecordKind {
    /// Suffix used in query keys
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Snapshot => "snapshot",
            RecordKind::Event => "event",
            RecordKind::Other => "other",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record returned by a store query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    #[serde(default)]
    pub value: Value,
}

impl Record {
    pub fn snapshot(value: Value) -> Self {
        Self {
            kind: RecordKind::Snapshot,
            value,
        }
    }

    pub fn event(value: Value) -> Self {
        Self {
            kind: RecordKind::Event,
            value,
        }
    }

    pub fn is_event(&self) -> bool {
        self.kind == RecordKind::Event
    }

    /// JSON text of `value`, the haystack for literal matching
    pub fn serialized_value(&self) -> String {
        self.value.to_string()
    }
}
