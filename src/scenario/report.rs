// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario Outcomes
//!
//! A scenario either passes, is skipped because it does not apply to the
//! command, or fails with a [`ScenarioError`] carrying expected versus
//! observed context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::errors::HarnessError;

/// The eight scenario classes, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Authorization,
    Acceptance,
    RequiredFieldRejection,
    RequiredOnlyAcceptance,
    EmptyValueRejection,
    InvalidTypeRejection,
    WorkVerification,
    EventVerification,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 8] = [
        ScenarioKind::Authorization,
        ScenarioKind::Acceptance,
        ScenarioKind::RequiredFieldRejection,
        ScenarioKind::RequiredOnlyAcceptance,
        ScenarioKind::EmptyValueRejection,
        ScenarioKind::InvalidTypeRejection,
        ScenarioKind::WorkVerification,
        ScenarioKind::EventVerification,
    ];
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioKind::Authorization => "authorization",
            ScenarioKind::Acceptance => "acceptance",
            ScenarioKind::RequiredFieldRejection => "required-field rejection",
            ScenarioKind::RequiredOnlyAcceptance => "required-only acceptance",
            ScenarioKind::EmptyValueRejection => "empty-value rejection",
            ScenarioKind::InvalidTypeRejection => "invalid-type rejection",
            ScenarioKind::WorkVerification => "work verification",
            ScenarioKind::EventVerification => "event verification",
        };
        f.write_str(name)
    }
}

/// Why a scenario failed
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The backend did not behave as expected
    #[error("{scenario} failed: expected {expected}, observed {observed}")]
    Assertion {
        scenario: ScenarioKind,
        expected: String,
        observed: String,
    },

    /// The scenario was authored incorrectly
    #[error("{scenario} is misconfigured: {message}")]
    Configuration {
        scenario: ScenarioKind,
        message: String,
    },

    /// A collaborator failed outside an expected rejection
    #[error("{scenario} aborted: {source}")]
    Harness {
        scenario: ScenarioKind,
        #[source]
        source: HarnessError,
    },
}

impl ScenarioError {
    pub fn assertion(
        scenario: ScenarioKind,
        expected: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        ScenarioError::Assertion {
            scenario,
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    /// Attribute a harness error to a scenario, keeping configuration errors distinct
    pub fn from_harness(scenario: ScenarioKind, error: HarnessError) -> Self {
        match error {
            HarnessError::Configuration(message) => {
                ScenarioError::Configuration { scenario, message }
            }
            source => ScenarioError::Harness { scenario, source },
        }
    }

    pub fn scenario(&self) -> ScenarioKind {
        match self {
            ScenarioError::Assertion { scenario, .. }
            | ScenarioError::Configuration { scenario, .. }
            | ScenarioError::Harness { scenario, .. } => *scenario,
        }
    }
}

/// Result type for scenario execution
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// How a scenario that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Skipped { reason: String },
}

/// Record of one scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: ScenarioKind,
    #[serde(flatten)]
    pub status: ScenarioStatus,
    /// Commands submitted by the scenario
    pub submissions: u32,
    /// Store queries issued, poll attempts and final checks included
    pub queries: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScenarioReport {
    pub fn passed(scenario: ScenarioKind, started_at: DateTime<Utc>, submissions: u32, queries: u32) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Passed,
            submissions,
            queries,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn skipped(scenario: ScenarioKind, reason: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            scenario,
            status: ScenarioStatus::Skipped {
                reason: reason.into(),
            },
            submissions: 0,
            queries: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ScenarioStatus::Skipped { .. })
    }
}

/// Reports for every scenario class run against one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub command: String,
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_passed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.reports.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn get(&self, scenario: ScenarioKind) -> Option<&ScenarioReport> {
        self.reports.iter().find(|r| r.scenario == scenario)
    }
}
