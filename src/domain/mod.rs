// Copyright (c) 2025 - Cowboy AI, Inc.
//! Harness Domain Models
//!
//! Static descriptions of a command under test and the shape of what the
//! backend returns. All values are built from schema literals per test run
//! and never persisted by the harness.
//!
//! # Value Objects with Invariants
//!
//! - [`FieldSchema`] - validated, ordered list of [`FieldSpec`]s
//! - [`PrimitiveType`] - closed set of input types
//! - [`EntityTag`] - read-model / event-stream name
//!
//! # Expectations
//!
//! - [`ExpectedWork`] with a [`WorkExpectation`] verdict rule
//! - [`ExpectedEvent`] - event registration claim
//!
//! # Query Results
//!
//! - [`Record`] tagged by [`RecordKind`]

pub mod expectation;
pub mod field;
pub mod record;

pub use expectation::{EntityTag, ExpectedEvent, ExpectedWork, WorkExpectation};
pub use field::{FieldSchema, FieldSpec, PrimitiveType};
pub use record::{Record, RecordKind};
