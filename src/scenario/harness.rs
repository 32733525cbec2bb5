// Copyright (c) 2025 - Cowboy AI, Inc.
//! Command Harness
//!
//! Runs the scenario classes against one command. Each scenario is a
//! linear sequence with no state shared with other scenarios:
//!
//! ```text
//! VariableSets ─▶ InputSet ─▶ mutate(document) ─▶ accepted / rejected
//!                                   │
//!                          (effect scenarios only)
//!                                   ▼
//!                 poll_until(query(key), non-empty) ─▶ evaluate ─▶ pass / fail
//! ```
//!
//! # Timeout Semantics
//!
//! A poll timeout is logged, then one final authoritative query is issued
//! and its evaluation decides the scenario. A slow but correct backend
//! still passes; an incorrect one fails with expected versus observed.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::HarnessConfig;
use crate::domain::{ExpectedEvent, ExpectedWork, Record, WorkExpectation};
use crate::errors::{HarnessError, HarnessResult};
use crate::evaluator::{describe_records, evaluate_work, event_registered};
use crate::keys::QueryKey;
use crate::mutation::{MutationBuilder, MutationDocument};
use crate::polling::{poll_until, PollOutcome};
use crate::transport::{
    CommandTransport, CorrelationIdGenerator, IdentityProvider, Rejection, Token,
    UuidCorrelationIds,
};
use crate::variables::{InputSet, VariableSets};

use super::command::{CommandUnderTest, Roles};
use super::report::{ScenarioError, ScenarioKind, ScenarioReport, ScenarioResult, SuiteReport};

const EXPECTED_REJECTION: &str = "rejection with a non-empty message";

/// Scenario orchestrator for one command
pub struct CommandHarness {
    command: CommandUnderTest,
    document: MutationDocument,
    variables: VariableSets,
    config: HarnessConfig,
    transport: Arc<dyn CommandTransport>,
    identity: Arc<dyn IdentityProvider>,
    ids: Arc<dyn CorrelationIdGenerator>,
}

impl CommandHarness {
    /// Prepare a harness, failing before any network interaction if the
    /// command description is malformed
    ///
    /// Checks that the command name is an identifier and that every
    /// triggering input names only declared fields (or the correlation field).
    pub fn new(
        command: CommandUnderTest,
        config: HarnessConfig,
        transport: Arc<dyn CommandTransport>,
        identity: Arc<dyn IdentityProvider>,
    ) -> HarnessResult<Self> {
        let document = MutationBuilder::new(command.name.clone())
            .schema(&command.schema)
            .build()?;
        let variables = VariableSets::derive(&command.schema);

        let triggering_inputs = command
            .expected_work
            .iter()
            .map(|w| &w.triggering_input)
            .chain(command.expected_events.iter().map(|e| &e.triggering_input));
        for input in triggering_inputs {
            if let Some(unknown) = input.keys().find(|key| {
                *key != config.correlation_field && command.schema.get(key).is_none()
            }) {
                return Err(HarnessError::Configuration(format!(
                    "triggering input names undeclared field {:?} of {}",
                    unknown, command.name
                )));
            }
        }

        Ok(Self {
            command,
            document,
            variables,
            config,
            transport,
            identity,
            ids: Arc::new(UuidCorrelationIds),
        })
    }

    /// Replace the correlation id source
    pub fn with_id_generator(mut self, ids: Arc<dyn CorrelationIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn document(&self) -> &MutationDocument {
        &self.document
    }

    pub fn variables(&self) -> &VariableSets {
        &self.variables
    }

    /// Run every scenario class in order, stopping at the first failure
    pub async fn run_all(&self) -> ScenarioResult<SuiteReport> {
        let mut reports = Vec::with_capacity(ScenarioKind::ALL.len());

        for kind in ScenarioKind::ALL {
            let span = info_span!("scenario", scenario = %kind, command = %self.command.name);
            let result = self.run(kind).instrument(span).await;

            match result {
                Ok(report) => reports.push(report),
                Err(err) => {
                    error!(command = %self.command.name, "{}", err);
                    return Err(err);
                }
            }
        }

        let suite = SuiteReport {
            command: self.command.name.clone(),
            reports,
        };
        info!(
            command = %suite.command,
            passed = suite.passed(),
            skipped = suite.skipped(),
            "scenario suite finished"
        );
        Ok(suite)
    }

    /// Run one scenario class
    pub async fn run(&self, kind: ScenarioKind) -> ScenarioResult<ScenarioReport> {
        let report = match kind {
            ScenarioKind::Authorization => self.authorization().await,
            ScenarioKind::Acceptance => self.acceptance().await,
            ScenarioKind::RequiredFieldRejection => self.required_field_rejection().await,
            ScenarioKind::RequiredOnlyAcceptance => self.required_only_acceptance().await,
            ScenarioKind::EmptyValueRejection => self.empty_value_rejection().await,
            ScenarioKind::InvalidTypeRejection => self.invalid_type_rejection().await,
            ScenarioKind::WorkVerification => self.work_verification().await,
            ScenarioKind::EventVerification => self.event_verification().await,
        }?;

        if report.is_skipped() {
            debug!(scenario = %kind, "scenario skipped");
        } else {
            info!(scenario = %kind, "scenario passed");
        }
        Ok(report)
    }

    /// Wrong identity is rejected; every declared role is accepted
    pub async fn authorization(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::Authorization;
        let roles = match &self.command.roles {
            Roles::Anyone => return Ok(ScenarioReport::skipped(kind, "command grants universal access")),
            Roles::Restricted(roles) => roles,
        };
        let started_at = Utc::now();

        let anonymous = self.identity.client_for(Token::Anonymous);
        let submission = self.submit(anonymous.as_ref(), &self.variables.all).await;
        expect_rejection(kind, submission)?;

        for role in roles {
            let token = self
                .identity
                .token_for(&self.config.identity, role)
                .await
                .map_err(|e| ScenarioError::from_harness(kind, e))?;
            let client = self.identity.client_for(token);

            let submission = self.submit(client.as_ref(), &self.variables.all).await;
            expect_acceptance(kind, submission).map_err(|err| match err {
                ScenarioError::Assertion { observed, .. } => ScenarioError::assertion(
                    kind,
                    format!("role {:?} to be accepted", role),
                    observed,
                ),
                other => other,
            })?;
        }

        Ok(ScenarioReport::passed(kind, started_at, roles.len() as u32 + 1, 0))
    }

    /// Every field present with a valid value is accepted
    pub async fn acceptance(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::Acceptance;
        let started_at = Utc::now();

        let submission = self.submit(self.transport.as_ref(), &self.variables.all).await;
        expect_acceptance(kind, submission)?;

        Ok(ScenarioReport::passed(kind, started_at, 1, 0))
    }

    /// Submitting no variables is rejected
    pub async fn required_field_rejection(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::RequiredFieldRejection;
        if !self.command.schema.has_required_fields() {
            return Ok(ScenarioReport::skipped(kind, "schema declares no required field"));
        }
        let started_at = Utc::now();

        let submission = self.submit(self.transport.as_ref(), &InputSet::new()).await;
        expect_rejection(kind, submission)?;

        Ok(ScenarioReport::passed(kind, started_at, 1, 0))
    }

    /// Only the required fields are enough
    pub async fn required_only_acceptance(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::RequiredOnlyAcceptance;
        if !self.command.schema.has_required_fields() {
            return Ok(ScenarioReport::skipped(kind, "schema declares no required field"));
        }
        let started_at = Utc::now();

        let submission = self
            .submit(self.transport.as_ref(), &self.variables.required_only)
            .await;
        expect_acceptance(kind, submission)?;

        Ok(ScenarioReport::passed(kind, started_at, 1, 0))
    }

    /// Empty/zero values are rejected
    pub async fn empty_value_rejection(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::EmptyValueRejection;
        if self.command.schema.is_empty() {
            return Ok(ScenarioReport::skipped(kind, "schema declares no field"));
        }
        let started_at = Utc::now();

        let submission = self.submit(self.transport.as_ref(), &self.variables.empty).await;
        expect_rejection(kind, submission)?;

        Ok(ScenarioReport::passed(kind, started_at, 1, 0))
    }

    /// Values of the wrong runtime type are rejected
    pub async fn invalid_type_rejection(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::InvalidTypeRejection;
        if self.command.schema.is_empty() {
            return Ok(ScenarioReport::skipped(kind, "schema declares no field"));
        }
        let started_at = Utc::now();

        let submission = self
            .submit(self.transport.as_ref(), &self.variables.invalid_type)
            .await;
        expect_rejection(kind, submission)?;

        Ok(ScenarioReport::passed(kind, started_at, 1, 0))
    }

    /// Each declared work item becomes visible in its read model
    pub async fn work_verification(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::WorkVerification;
        if self.command.expected_work.is_empty() {
            return Ok(ScenarioReport::skipped(kind, "no expected work declared"));
        }
        if let Some(unset) = self.command.expected_work.iter().find(|w| w.expectation.is_none()) {
            return Err(ScenarioError::Configuration {
                scenario: kind,
                message: format!("work {:?} has no expectation", unset.description),
            });
        }
        let started_at = Utc::now();
        let mut queries = 0;

        for work in &self.command.expected_work {
            queries += self.verify_work(work).await?;
        }

        Ok(ScenarioReport::passed(
            kind,
            started_at,
            self.command.expected_work.len() as u32,
            queries,
        ))
    }

    /// Each declared event is durably recorded
    pub async fn event_verification(&self) -> ScenarioResult<ScenarioReport> {
        let kind = ScenarioKind::EventVerification;
        if self.command.expected_events.is_empty() {
            return Ok(ScenarioReport::skipped(kind, "no expected event declared"));
        }
        let started_at = Utc::now();
        let mut queries = 0;

        for event in &self.command.expected_events {
            queries += self.verify_event(event).await?;
        }

        Ok(ScenarioReport::passed(
            kind,
            started_at,
            self.command.expected_events.len() as u32,
            queries,
        ))
    }

    async fn verify_work(&self, work: &ExpectedWork) -> ScenarioResult<u32> {
        let kind = ScenarioKind::WorkVerification;
        let correlation_id = self.ids.next_id();
        let input = self.correlated_input(&work.triggering_input, &correlation_id);

        let submission = self.submit(self.transport.as_ref(), &input).await;
        match (&work.expectation, submission) {
            // a rejection leaves no record either
            (Some(WorkExpectation::Absent), Err(rejection)) => {
                debug!(message = %rejection.message, "rejected; expecting no record");
            }
            (_, submission) => {
                expect_acceptance(kind, submission)?;
            }
        }

        let key = QueryKey::snapshot(&work.observed_through, &correlation_id);
        let (records, queries) = self.await_records(kind, &key).await?;

        let verdict = evaluate_work(&records, work.expectation.as_ref())
            .map_err(|e| ScenarioError::from_harness(kind, e))?;
        if !verdict {
            return Err(ScenarioError::assertion(
                kind,
                format!("{:?} at {} ({})", work.expectation, key, work.description),
                describe_records(&records),
            ));
        }

        debug!(%key, description = %work.description, "work verified");
        Ok(queries)
    }

    async fn verify_event(&self, event: &ExpectedEvent) -> ScenarioResult<u32> {
        let kind = ScenarioKind::EventVerification;
        let correlation_id = self.ids.next_id();
        let input = self.correlated_input(&event.triggering_input, &correlation_id);

        let submission = self.submit(self.transport.as_ref(), &input).await;
        expect_acceptance(kind, submission)?;

        let key = QueryKey::event(&event.observed_through, &correlation_id);
        let (records, queries) = self.await_records(kind, &key).await?;

        if !event_registered(&records) {
            return Err(ScenarioError::assertion(
                kind,
                format!("event {} recorded at {}", event.event_name, key),
                describe_records(&records),
            ));
        }

        debug!(%key, event = %event.event_name, "event verified");
        Ok(queries)
    }

    /// Poll `key` until any record shows up; after a timeout, re-query once
    /// and return that authoritative result
    async fn await_records(
        &self,
        kind: ScenarioKind,
        key: &QueryKey,
    ) -> ScenarioResult<(Vec<Record>, u32)> {
        let transport = self.transport.as_ref();
        let outcome = poll_until(
            || transport.query(key),
            |records: &Vec<Record>| !records.is_empty(),
            &self.config.poll,
        )
        .await
        .map_err(|e| ScenarioError::from_harness(kind, e))?;

        match outcome {
            PollOutcome::Satisfied {
                value, attempts, ..
            } => Ok((value, attempts)),
            PollOutcome::TimedOut {
                attempts, elapsed, ..
            } => {
                warn!(
                    %key,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "no record before poll deadline; running final check"
                );
                let records = transport
                    .query(key)
                    .await
                    .map_err(|e| ScenarioError::from_harness(kind, e))?;
                Ok((records, attempts + 1))
            }
        }
    }

    /// The triggering input exactly as declared, plus the correlation id
    fn correlated_input(&self, triggering_input: &InputSet, correlation_id: &str) -> InputSet {
        triggering_input
            .clone()
            .with(self.config.correlation_field.clone(), correlation_id)
    }

    async fn submit(
        &self,
        transport: &dyn CommandTransport,
        variables: &InputSet,
    ) -> Result<Value, Rejection> {
        let undeclared = self.document.undeclared(variables);
        debug!(
            command = %self.document.command(),
            fields = variables.len(),
            ?undeclared,
            "submitting command"
        );
        transport.mutate(variables, &self.document).await
    }
}

fn expect_rejection(kind: ScenarioKind, submission: Result<Value, Rejection>) -> ScenarioResult<()> {
    match submission {
        Ok(response) => Err(ScenarioError::assertion(
            kind,
            EXPECTED_REJECTION,
            format!("accepted with {}", response),
        )),
        Err(rejection) if !rejection.has_message() => Err(ScenarioError::assertion(
            kind,
            EXPECTED_REJECTION,
            "rejection without a message",
        )),
        Err(rejection) => {
            debug!(scenario = %kind, message = %rejection.message, "rejected as expected");
            Ok(())
        }
    }
}

fn expect_acceptance(
    kind: ScenarioKind,
    submission: Result<Value, Rejection>,
) -> ScenarioResult<Value> {
    match submission {
        Ok(Value::Null) => Err(ScenarioError::assertion(
            kind,
            "a non-null response",
            "null response",
        )),
        Ok(response) => Ok(response),
        Err(rejection) => Err(ScenarioError::assertion(
            kind,
            "command to be accepted",
            format!("rejected: {}", rejection.message),
        )),
    }
}
