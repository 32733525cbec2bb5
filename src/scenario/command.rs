// Copyright (c) 2025 - Cowboy AI, Inc.
//! Command Under Test
//!
//! Static description of one command: its name, accepted inputs, who may
//! submit it, and the effects it must produce.

use serde::{Deserialize, Serialize};

use crate::domain::{ExpectedEvent, ExpectedWork, FieldSchema};

/// Marker a role list uses to grant access to everyone
pub const UNIVERSAL_ROLE: &str = "*";

/// Roles allowed to submit the command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Roles {
    /// Universal access; authorization scenarios are skipped
    #[default]
    Anyone,
    /// Only these roles are accepted
    Restricted(Vec<String>),
}

impl Roles {
    /// Interpret a declared role list; the universal marker wins
    pub fn from_declared<I, S>(declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<String> = declared.into_iter().map(Into::into).collect();
        if roles.is_empty() || roles.iter().any(|r| r == UNIVERSAL_ROLE) {
            Roles::Anyone
        } else {
            Roles::Restricted(roles)
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Roles::Anyone)
    }
}

/// Everything the harness needs to know about one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandUnderTest {
    pub name: String,
    pub schema: FieldSchema,
    #[serde(default)]
    pub roles: Roles,
    #[serde(default)]
    pub expected_work: Vec<ExpectedWork>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

impl CommandUnderTest {
    pub fn new(name: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            roles: Roles::Anyone,
            expected_work: Vec::new(),
            expected_events: Vec::new(),
        }
    }

    pub fn roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }

    pub fn expect_work(mut self, work: ExpectedWork) -> Self {
        self.expected_work.push(work);
        self
    }

    pub fn expect_event(mut self, event: ExpectedEvent) -> Self {
        self.expected_events.push(event);
        self
    }
}
