// Copyright (c) 2025 - Cowboy AI, Inc.

//! Query key addressing for the read/event store
//!
//! Every query the harness issues is keyed by
//!
//! ```text
//! {EntityTag}-{correlationId}-{kind}
//! ```
//!
//! where `kind` is `snapshot` or `event`. Keys are only ever constructed
//! here, never parsed.
//!
//! # Examples
//!
//! ```rust
//! use cim_command_harness::keys::QueryKey;
//! use cim_command_harness::domain::EntityTag;
//!
//! let tag = EntityTag::new("Tattle");
//! assert_eq!(QueryKey::snapshot(&tag, "abc").as_str(), "Tattle-abc-snapshot");
//! assert_eq!(QueryKey::event(&tag, "abc").as_str(), "Tattle-abc-event");
//! ```

use serde::Serialize;
use std::fmt;

use crate::domain::{EntityTag, RecordKind};

/// Fully-formed store address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Key for the read-model snapshot of a correlated entity
    pub fn snapshot(tag: &EntityTag, correlation_id: &str) -> Self {
        Self::build(tag, correlation_id, RecordKind::Snapshot)
    }

    /// Key for events recorded under a correlation id
    pub fn event(tag: &EntityTag, correlation_id: &str) -> Self {
        Self::build(tag, correlation_id, RecordKind::Event)
    }

    fn build(tag: &EntityTag, correlation_id: &str, kind: RecordKind) -> Self {
        Self(format!("{}-{}-{}", tag, correlation_id, kind))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
