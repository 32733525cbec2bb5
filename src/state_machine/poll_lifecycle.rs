// Copyright (c) 2025 - Cowboy AI, Inc.
//! Poll Lifecycle State Machine
//!
//! Formal FSM for one bounded retry loop. Uses the generic StateMachine
//! trait from parent module.
//!
//! # State Machine Type
//!
//! This is a **Mealy Machine**: the next phase depends on the current phase
//! and the latest observation.
//!
//! # Phases
//!
//! - Polling: another attempt may follow
//! - Satisfied: the predicate held (terminal)
//! - TimedOut: the next attempt would land past the deadline (terminal)
//!
//! # Transition Rule
//!
//! ```text
//! Polling + satisfied                          → Satisfied
//! Polling + !satisfied, elapsed + interval ≤ D → Polling
//! Polling + !satisfied, elapsed + interval > D → TimedOut
//! ```
//!
//! With attempts at `t = 0, I, 2I, ...` a never-true predicate is observed
//! exactly `floor(D / I) + 1` times.

use std::fmt;
use std::time::Duration;

use super::{StateMachine, TransitionError, TransitionResult};

/// Phase of a poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Polling,
    Satisfied,
    TimedOut,
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollPhase::Polling)
    }
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollPhase::Polling => write!(f, "Polling"),
            PollPhase::Satisfied => write!(f, "Satisfied"),
            PollPhase::TimedOut => write!(f, "TimedOut"),
        }
    }
}

/// Result of one attempt, measured by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Time since the first attempt started
    pub elapsed: Duration,
    /// Whether the predicate held for this attempt's result
    pub satisfied: bool,
}

/// Poll loop state: phase, attempt count and budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollLifecycle {
    phase: PollPhase,
    attempts: u32,
    interval: Duration,
    deadline: Duration,
}

impl PollLifecycle {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self {
            phase: PollPhase::Polling,
            attempts: 0,
            interval,
            deadline,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Observations recorded so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn next_phase(&self, observation: &Observation) -> PollPhase {
        if observation.satisfied {
            PollPhase::Satisfied
        } else if observation.elapsed + self.interval > self.deadline {
            PollPhase::TimedOut
        } else {
            PollPhase::Polling
        }
    }
}

impl StateMachine for PollLifecycle {
    type Input = Observation;
    type Output = PollPhase;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        if self.phase.is_terminal() {
            return Err(TransitionError::InvalidTransition {
                from: self.phase.to_string(),
                to: self.next_phase(input).to_string(),
            });
        }

        let phase = self.next_phase(input);
        let next = Self {
            phase,
            attempts: self.attempts + 1,
            ..self.clone()
        };
        Ok((next, phase))
    }
}
