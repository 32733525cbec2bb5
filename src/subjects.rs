// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for harness requests
//!
//! Every request the NATS transport sends follows the pattern:
//!
//! ```text
//! {root}.{channel}[.{command}]
//! ```
//!
//! This allows for:
//! - Per-command routing (`harness.command.OrderFruit`)
//! - A single query endpoint (`harness.query`)
//! - Token issuance (`harness.identity.token`)
//! - Global subscriptions on the backend side (`harness.>`)
//!
//! # Examples
//!
//! ```rust
//! use cim_command_harness::subjects::{Channel, SubjectBuilder};
//!
//! let subjects = SubjectBuilder::new("harness");
//! assert_eq!(subjects.command("OrderFruit"), "harness.command.OrderFruit");
//! assert_eq!(subjects.channel(Channel::Query), "harness.query");
//! assert_eq!(subjects.all(), "harness.>");
//! ```

use std::fmt;

/// Default root namespace for harness subjects
pub const HARNESS_ROOT: &str = "harness";

/// Request channels exposed by a backend under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Command submission, one subject per command
    Command,
    /// Read/event store query
    Query,
    /// Role-scoped token issuance
    Identity,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Command => write!(f, "command"),
            Channel::Query => write!(f, "query"),
            Channel::Identity => write!(f, "identity.token"),
        }
    }
}

/// Builder for harness NATS subjects under one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectBuilder {
    root: String,
}

impl SubjectBuilder {
    /// Create a builder rooted at `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Subject for a bare channel
    ///
    /// Returns: `{root}.{channel}`
    pub fn channel(&self, channel: Channel) -> String {
        format!("{}.{}", self.root, channel)
    }

    /// Subject a specific command is submitted on
    ///
    /// Returns: `{root}.command.{command}`
    pub fn command(&self, command: &str) -> String {
        format!("{}.{}", self.channel(Channel::Command), command)
    }

    /// Wildcard covering every harness request
    ///
    /// Returns: `{root}.>`
    pub fn all(&self) -> String {
        format!("{}.>", self.root)
    }
}

impl Default for SubjectBuilder {
    fn default() -> Self {
        Self::new(HARNESS_ROOT)
    }
}
