//! Command verification harness for event-sourced CIM backends
//!
//! Given an abstract description of a command's inputs and expected
//! downstream effects, this crate synthesizes boundary-condition scenarios
//! and verifies outcomes that only become visible after the backend's
//! projections catch up.
//!
//! # Module Organization
//!
//! - [`domain`] - field schemas, expectations, record shape
//! - [`variables`] - the four canonical input variants
//! - [`mutation`] - parameterized write-request documents
//! - [`keys`] - `{EntityTag}-{correlationId}-{kind}` query keys
//! - [`state_machine`] / [`polling`] - bounded retry for eventual consistency
//! - [`evaluator`] - verdicts over raw query results
//! - [`transport`] - collaborator traits; [`nats`] implements them
//! - [`scenario`] - the orchestrator
//! - [`config`], [`errors`], [`telemetry`] - ambient concerns

pub mod config;
pub mod domain;
pub mod errors;
pub mod evaluator;
pub mod keys;
pub mod mutation;
pub mod nats;
pub mod polling;
pub mod scenario;
pub mod state_machine;
pub mod subjects;
pub mod telemetry;
pub mod transport;
pub mod variables;

// Re-export commonly used types
pub use config::{HarnessConfig, PollSettings};
pub use errors::{HarnessError, HarnessResult, SchemaError};
pub use nats::{NatsClient, NatsConfig, NatsIdentityProvider, NatsTransport};
pub use scenario::{CommandHarness, CommandUnderTest, ScenarioError, ScenarioKind, SuiteReport};

/// Prelude module with commonly used imports
pub mod prelude {
    pub use crate::config::{HarnessConfig, PollSettings};
    pub use crate::domain::{
        EntityTag, ExpectedEvent, ExpectedWork, FieldSchema, FieldSpec, PrimitiveType, Record,
        RecordKind, WorkExpectation,
    };
    pub use crate::errors::{HarnessError, HarnessResult};
    pub use crate::nats::{NatsClient, NatsConfig, NatsIdentityProvider, NatsTransport};
    pub use crate::scenario::{
        CommandHarness, CommandUnderTest, Roles, ScenarioError, ScenarioKind, ScenarioReport,
        SuiteReport,
    };
    pub use crate::transport::{
        CommandTransport, CorrelationIdGenerator, IdentityProvider, Rejection, Token,
    };
    pub use crate::variables::{InputSet, VariableSets};
    pub use std::sync::Arc;
}
