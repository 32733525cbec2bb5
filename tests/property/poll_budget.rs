// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Polling Lifecycle
//!
//! Drives [`PollLifecycle`] with simulated elapsed times to check that the
//! attempt count is bounded by the poll budget and that terminal phases
//! stay terminal.

use cim_command_harness::config::PollSettings;
use cim_command_harness::state_machine::{Observation, PollLifecycle, PollPhase, StateMachine};
use proptest::prelude::*;
use std::time::Duration;

/// (interval_ms, deadline_ms) with interval <= deadline
fn budget_strategy() -> impl Strategy<Value = (u64, u64)> {
    (1u64..500, 0u64..40, 0u64..500)
        .prop_map(|(interval, multiple, rest)| (interval, interval * (multiple + 1) + rest))
}

/// Run the lifecycle to a terminal phase, one attempt per interval,
/// satisfied from attempt `satisfied_at` on (if ever)
fn drive(interval_ms: u64, deadline_ms: u64, satisfied_at: Option<u32>) -> (PollLifecycle, PollPhase) {
    let interval = Duration::from_millis(interval_ms);
    let mut lifecycle = PollLifecycle::new(interval, Duration::from_millis(deadline_ms));

    loop {
        let attempt = lifecycle.attempts();
        let observation = Observation {
            elapsed: interval * attempt,
            satisfied: satisfied_at.is_some_and(|k| attempt >= k),
        };
        let (next, phase) = lifecycle
            .transition(&observation)
            .expect("non-terminal lifecycle must accept an observation");
        lifecycle = next;
        if phase.is_terminal() {
            return (lifecycle, phase);
        }
    }
}

proptest! {
    /// Property: An unsatisfied poll makes exactly `max_attempts` attempts
    #[test]
    fn prop_timeout_uses_whole_budget((interval, deadline) in budget_strategy()) {
        let settings = PollSettings::new(
            Duration::from_millis(interval),
            Duration::from_millis(deadline),
        ).unwrap();

        let (lifecycle, phase) = drive(interval, deadline, None);

        prop_assert_eq!(phase, PollPhase::TimedOut);
        prop_assert_eq!(lifecycle.attempts(), settings.max_attempts());
        prop_assert!(u64::from(lifecycle.attempts() - 1) * interval <= deadline);
    }

    /// Property: Satisfaction within budget ends the poll on that attempt
    #[test]
    fn prop_satisfied_within_budget(
        (interval, deadline) in budget_strategy(),
        k in 0u32..40,
    ) {
        let budget = (deadline / interval) as u32 + 1;
        prop_assume!(k < budget);

        let (lifecycle, phase) = drive(interval, deadline, Some(k));

        prop_assert_eq!(phase, PollPhase::Satisfied);
        prop_assert_eq!(lifecycle.attempts(), k + 1);
    }

    /// Property: Terminal phases reject every further observation
    #[test]
    fn prop_terminal_phase_is_final(
        (interval, deadline) in budget_strategy(),
        satisfied in any::<bool>(),
        elapsed in 0u64..20_000,
    ) {
        let (lifecycle, _) = drive(interval, deadline, satisfied.then_some(0));
        let observation = Observation {
            elapsed: Duration::from_millis(elapsed),
            satisfied,
        };

        prop_assert!(!lifecycle.can_transition(&observation));
    }
}
