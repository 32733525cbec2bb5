// Copyright (c) 2025 - Cowboy AI, Inc.
//! Polling Engine
//!
//! Bridges the gap between "command accepted" and "effect visible" in an
//! eventually-consistent store. A query closure is re-invoked every
//! `interval` until a predicate holds or the next attempt would land past
//! `deadline`.
//!
//! # Timeout Is Not an Error
//!
//! ```text
//! query() ──▶ predicate ──true──▶ Satisfied(value)
//!    ▲            │
//!    │          false
//!    │            ▼
//!  sleep ◀── within budget? ──no──▶ TimedOut(last value)
//! ```
//!
//! A timeout returns [`PollOutcome::TimedOut`] so the caller can run one
//! final authoritative check and report expected versus observed. Only a
//! failing query surfaces as `Err`.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::PollSettings;
use crate::errors::HarnessResult;
use crate::state_machine::{Observation, PollLifecycle, PollPhase, StateMachine};

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The predicate held for `value`
    Satisfied {
        value: T,
        attempts: u32,
        elapsed: Duration,
    },
    /// Budget exhausted; `last` is the final unsatisfying result
    TimedOut {
        last: T,
        attempts: u32,
        elapsed: Duration,
    },
}

impl<T> PollOutcome<T> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Satisfied { attempts, .. } | PollOutcome::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Satisfied { elapsed, .. } | PollOutcome::TimedOut { elapsed, .. } => {
                *elapsed
            }
        }
    }

    pub fn into_value(self) -> T {
        match self {
            PollOutcome::Satisfied { value, .. } => value,
            PollOutcome::TimedOut { last, .. } => last,
        }
    }
}

/// Re-run `query` until `predicate` holds or the deadline passes
///
/// Query errors propagate immediately; the predicate is never consulted
/// for a failed query.
pub async fn poll_until<T, F, Fut, P>(
    mut query: F,
    predicate: P,
    settings: &PollSettings,
) -> HarnessResult<PollOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HarnessResult<T>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut lifecycle = PollLifecycle::new(settings.interval(), settings.deadline());

    loop {
        let value = query().await?;
        let observation = Observation {
            elapsed: started.elapsed(),
            satisfied: predicate(&value),
        };

        let (next, phase) = lifecycle.transition(&observation)?;
        lifecycle = next;

        debug!(
            attempt = lifecycle.attempts(),
            elapsed_ms = observation.elapsed.as_millis() as u64,
            %phase,
            "poll attempt"
        );

        match phase {
            PollPhase::Satisfied => {
                return Ok(PollOutcome::Satisfied {
                    value,
                    attempts: lifecycle.attempts(),
                    elapsed: observation.elapsed,
                })
            }
            PollPhase::TimedOut => {
                return Ok(PollOutcome::TimedOut {
                    last: value,
                    attempts: lifecycle.attempts(),
                    elapsed: observation.elapsed,
                })
            }
            PollPhase::Polling => tokio::time::sleep(lifecycle.interval()).await,
        }
    }
}
