// Copyright (c) 2025 - Cowboy AI, Inc.
//! Harness Configuration
//!
//! Explicit configuration objects built once at scenario start and passed
//! by value into the harness. Nothing here is process-global.
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `HARNESS_NATS_URL` | `nats://localhost:4222` (comma separated) |
//! | `HARNESS_SUBJECT_ROOT` | `harness` |
//! | `HARNESS_POLL_INTERVAL_MS` | `250` |
//! | `HARNESS_POLL_DEADLINE_MS` | `10000` |
//! | `HARNESS_CORRELATION_FIELD` | `id` |
//! | `HARNESS_IDENTITY` | `harness` |

use std::time::Duration;

use crate::errors::{HarnessError, HarnessResult};
use crate::nats::NatsConfig;

/// Interval and deadline of every poll loop a scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    interval: Duration,
    deadline: Duration,
}

impl PollSettings {
    /// Validated poll settings
    ///
    /// The interval must be non-zero and no longer than the deadline.
    pub fn new(interval: Duration, deadline: Duration) -> HarnessResult<Self> {
        if interval.is_zero() {
            return Err(HarnessError::Configuration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if interval > deadline {
            return Err(HarnessError::Configuration(format!(
                "poll interval {:?} exceeds deadline {:?}",
                interval, deadline
            )));
        }
        Ok(Self { interval, deadline })
    }

    /// Wait between attempts
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cumulative budget; no attempt starts after it
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Upper bound on query invocations for a never-satisfied predicate
    pub fn max_attempts(&self) -> u32 {
        let intervals = self.deadline.as_nanos() / self.interval.as_nanos().max(1);
        u32::try_from(intervals)
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            deadline: Duration::from_secs(10),
        }
    }
}

/// Complete harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Poll loop budget for effect verification
    pub poll: PollSettings,
    /// NATS connection for the request/reply transport
    pub nats: NatsConfig,
    /// Input field that carries the correlation id
    pub correlation_field: String,
    /// Identity used when requesting role-scoped tokens
    pub identity: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            poll: PollSettings::default(),
            nats: NatsConfig::default(),
            correlation_field: "id".to_string(),
            identity: "harness".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> HarnessResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut nats = defaults.nats;
        if let Some(urls) = lookup("HARNESS_NATS_URL") {
            nats.servers = urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if nats.servers.is_empty() {
                return Err(HarnessError::Configuration(
                    "HARNESS_NATS_URL contains no server".to_string(),
                ));
            }
        }
        if let Some(root) = lookup("HARNESS_SUBJECT_ROOT") {
            nats.subject_root = root;
        }

        let interval = millis(&lookup, "HARNESS_POLL_INTERVAL_MS")?.unwrap_or(defaults.poll.interval());
        let deadline = millis(&lookup, "HARNESS_POLL_DEADLINE_MS")?.unwrap_or(defaults.poll.deadline());
        let poll = PollSettings::new(interval, deadline)?;

        let correlation_field =
            lookup("HARNESS_CORRELATION_FIELD").unwrap_or(defaults.correlation_field);
        if correlation_field.trim().is_empty() {
            return Err(HarnessError::Configuration(
                "HARNESS_CORRELATION_FIELD is empty".to_string(),
            ));
        }

        Ok(Self {
            poll,
            nats,
            correlation_field,
            identity: lookup("HARNESS_IDENTITY").unwrap_or(defaults.identity),
        })
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }
}

fn millis<F>(lookup: &F, name: &str) -> HarnessResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| HarnessError::Configuration(format!("{}={:?}: {}", name, raw, e)))
        })
        .transpose()
}
