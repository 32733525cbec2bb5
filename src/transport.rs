// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collaborator Interfaces
//!
//! The harness consumes the backend only through these traits:
//!
//! - [`CommandTransport`] - submit commands, query the read/event store
//! - [`IdentityProvider`] - role-scoped tokens and clients bound to them
//! - [`CorrelationIdGenerator`] - unique ids threading a command to its effects
//!
//! [`crate::nats`] provides request/reply implementations; tests provide
//! in-memory ones.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Record;
use crate::errors::HarnessResult;
use crate::keys::QueryKey;
use crate::mutation::MutationDocument;
use crate::variables::InputSet;

/// A submitted command was refused
///
/// Any failure of a submit call is a rejection; only `message` is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("command rejected: {message}")]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether the rejection explains itself
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Credential presented with a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// No credential at all
    Anonymous,
    /// Opaque token issued for an identity and role
    Bearer(String),
}

impl Token {
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Token::Anonymous => None,
            Token::Bearer(token) => Some(token.as_str()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Anonymous => write!(f, "anonymous"),
            Token::Bearer(_) => write!(f, "bearer(..)"),
        }
    }
}

/// Transport to the backend under test
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Submit a command with `variables` bound to `document`'s parameters
    async fn mutate(
        &self,
        variables: &InputSet,
        document: &MutationDocument,
    ) -> Result<Value, Rejection>;

    /// Read every record stored under `key`
    async fn query(&self, key: &QueryKey) -> HarnessResult<Vec<Record>>;
}

/// Issues tokens and clients for the authorization scenario class
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn token_for(&self, identity: &str, role: &str) -> HarnessResult<Token>;

    fn client_for(&self, token: Token) -> Arc<dyn CommandTransport>;
}

/// Source of per-scenario correlation ids
pub trait CorrelationIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Time-ordered UUID v7 correlation ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCorrelationIds;

impl CorrelationIdGenerator for UuidCorrelationIds {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}
