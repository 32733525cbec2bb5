// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario Orchestration
//!
//! Composes variable sets, the mutation document, polling and evaluation
//! into named boundary-condition scenarios for one command.
//!
//! # Architecture
//!
//! ```text
//! CommandUnderTest ──▶ CommandHarness
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!   VariableSets    MutationDocument   PollSettings
//!          └──────▶ CommandTransport ◀──────┘
//!                          │
//!                   Read/Event Store
//! ```
//!
//! # Scenario Classes
//!
//! 1. **Authorization** - wrong identity rejected, each declared role accepted
//!    (skipped for universal access)
//! 2. **Acceptance** - `All` variable set accepted with a non-null response
//! 3. **Required-field rejection** - no variables rejected (needs a required field)
//! 4. **Required-only acceptance** - `RequiredOnly` accepted (needs a required field)
//! 5. **Empty-value rejection** - `Empty` set rejected
//! 6. **Invalid-type rejection** - `InvalidType` set rejected
//! 7. **Work verification** - each [`ExpectedWork`](crate::domain::ExpectedWork)
//!    observed at `{EntityTag}-{id}-snapshot`
//! 8. **Event verification** - each [`ExpectedEvent`](crate::domain::ExpectedEvent)
//!    observed at `{EntityTag}-{id}-event`
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_command_harness::prelude::*;
//!
//! #[tokio::test]
//! async fn order_fruit() -> anyhow::Result<()> {
//!     let config = HarnessConfig::from_env()?;
//!     let client = NatsClient::new(config.nats.clone()).await?;
//!
//!     let schema = FieldSchema::new(vec![
//!         FieldSpec::required("fruit", PrimitiveType::String).with_example("apple"),
//!     ])?;
//!     let command = CommandUnderTest::new("OrderFruit", schema).expect_work(
//!         ExpectedWork::new(
//!             "stores the order",
//!             InputSet::new().with("fruit", "candy"),
//!             "Tattle",
//!             WorkExpectation::Exists,
//!         ),
//!     );
//!
//!     let harness = CommandHarness::new(
//!         command,
//!         config,
//!         Arc::new(NatsTransport::anonymous(client.clone())),
//!         Arc::new(NatsIdentityProvider::new(client)),
//!     )?;
//!
//!     harness.run_all().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod harness;
pub mod report;

pub use command::{CommandUnderTest, Roles, UNIVERSAL_ROLE};
pub use harness::CommandHarness;
pub use report::{
    ScenarioError, ScenarioKind, ScenarioReport, ScenarioResult, ScenarioStatus, SuiteReport,
};
