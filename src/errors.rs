//! Error types for harness operations

use thiserror::Error;

use crate::state_machine::TransitionError;

/// Errors that can occur while building or running command scenarios
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Harness configuration is incomplete or cannot be evaluated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Field schema or command definition is malformed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS request error
    #[error("NATS request error: {0}")]
    NatsRequest(String),

    /// Query against the read/event store failed
    #[error("Query failed for {key}: {message}")]
    Query { key: String, message: String },

    /// Identity provider could not issue a token
    #[error("Identity error: {0}")]
    Identity(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Poll loop was driven past a terminal phase
    #[error("Poll state error: {0}")]
    PollState(#[from] TransitionError),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Construction-time errors for field schemas and command names
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field name is empty")]
    EmptyName,

    #[error("Field name is not a valid identifier: {0}")]
    InvalidName(String),

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Example value {example:?} for field {field} is not a valid {expected}")]
    InvalidExample {
        field: String,
        example: String,
        expected: String,
    },

    #[error("Command name is not a valid identifier: {0:?}")]
    InvalidCommandName(String),
}

impl From<async_nats::Error> for HarnessError {
    fn from(err: async_nats::Error) -> Self {
        HarnessError::NatsConnection(err.to_string())
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Serialization(err.to_string())
    }
}
