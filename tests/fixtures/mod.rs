// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-command-harness
//!
//! Provides deterministic schemas, correlation ids and an in-memory
//! eventually-consistent backend for scenario tests.
//!
//! # Design Principles
//! - Correlation ids are sequential (`corr-1`, `corr-2`, ...), never random
//! - Effects become visible after a fixed delay measured on tokio's clock,
//!   so tests run with `start_paused = true` are deterministic
//! - Fault switches on [`BackendOptions`] model incorrect backends

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use cim_command_harness::config::{HarnessConfig, PollSettings};
use cim_command_harness::domain::{
    EntityTag, FieldSchema, FieldSpec, PrimitiveType, Record, RecordKind,
};
use cim_command_harness::errors::HarnessResult;
use cim_command_harness::keys::QueryKey;
use cim_command_harness::mutation::MutationDocument;
use cim_command_harness::transport::{
    CommandTransport, CorrelationIdGenerator, IdentityProvider, Rejection, Token,
};
use cim_command_harness::variables::InputSet;

pub const COMMAND: &str = "OrderFruit";
pub const ENTITY: &str = "Tattle";
pub const EVENT_NAME: &str = "FruitOrdered";
pub const ADMIN_ROLE: &str = "admin";

/// `[{fruit: String, required}]`
pub fn fruit_schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldSpec::required("fruit", PrimitiveType::String).with_example("apple"),
    ])
    .expect("Invalid fruit schema")
}

/// Required fruit plus optional drink and count
pub fn order_schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldSpec::required("fruit", PrimitiveType::String).with_example("apple"),
        FieldSpec::optional("drink", PrimitiveType::String).with_example("water"),
        FieldSpec::optional("count", PrimitiveType::Int).with_example("2"),
    ])
    .expect("Invalid order schema")
}

/// Only optional fields
pub fn optional_schema() -> FieldSchema {
    FieldSchema::new(vec![FieldSpec::optional("note", PrimitiveType::String)])
        .expect("Invalid optional schema")
}

/// 50 ms interval, 1 s deadline
pub fn fast_poll() -> PollSettings {
    PollSettings::new(Duration::from_millis(50), Duration::from_secs(1))
        .expect("Invalid poll settings")
}

pub fn test_config() -> HarnessConfig {
    HarnessConfig::default().with_poll(fast_poll())
}

/// Deterministic correlation ids: `corr-1`, `corr-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl CorrelationIdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("corr-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Behavior switches of the in-memory backend
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub entity: EntityTag,
    pub event_name: String,
    /// Delay before a write's effects become visible
    pub visibility_delay: Duration,
    /// `None` accepts any caller
    pub allowed_roles: Option<Vec<String>>,
    pub record_snapshots: bool,
    pub record_events: bool,
    /// Reject invalid input; off models a backend without validation
    pub validate: bool,
    /// Reject with an empty message
    pub blank_rejections: bool,
    /// Queries per key that see nothing, whatever is stored
    pub hidden_for_queries: u32,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            entity: EntityTag::new(ENTITY),
            event_name: EVENT_NAME.to_string(),
            visibility_delay: Duration::from_millis(200),
            allowed_roles: None,
            record_snapshots: true,
            record_events: true,
            validate: true,
            blank_rejections: false,
            hidden_for_queries: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    key: String,
    record: Record,
    visible_at: Instant,
}

/// Eventually-consistent command backend held in memory
#[derive(Clone)]
pub struct InMemoryBackend {
    schema: FieldSchema,
    options: Arc<BackendOptions>,
    records: Arc<Mutex<Vec<StoredRecord>>>,
    submissions: Arc<AtomicU32>,
    queries: Arc<AtomicU32>,
    queries_by_key: Arc<Mutex<HashMap<String, u32>>>,
}

impl InMemoryBackend {
    pub fn new(schema: FieldSchema, options: BackendOptions) -> Self {
        Self {
            schema,
            options: Arc::new(options),
            records: Arc::new(Mutex::new(Vec::new())),
            submissions: Arc::new(AtomicU32::new(0)),
            queries: Arc::new(AtomicU32::new(0)),
            queries_by_key: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Client presenting `token`
    pub fn client(&self, token: Token) -> Arc<BackendClient> {
        Arc::new(BackendClient {
            backend: self.clone(),
            token,
        })
    }

    /// Client holding a token for the admin role
    pub fn admin_client(&self) -> Arc<BackendClient> {
        self.client(Token::Bearer(token_for_role(ADMIN_ROLE)))
    }

    pub fn submissions(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }

    /// Store a record directly, visible immediately
    pub fn seed(&self, key: &QueryKey, record: Record) {
        self.records
            .lock()
            .expect("Backend lock poisoned")
            .push(StoredRecord {
                key: key.to_string(),
                record,
                visible_at: Instant::now(),
            });
    }

    /// Count a query of `key`, returning whether stored records may be seen
    fn observe(&self, key: &QueryKey) -> bool {
        let mut counts = self.queries_by_key.lock().expect("Backend lock poisoned");
        let seen = counts.entry(key.to_string()).or_insert(0);
        *seen += 1;
        *seen > self.options.hidden_for_queries
    }

    fn authorize(&self, token: &Token) -> Result<(), String> {
        let Some(allowed) = &self.options.allowed_roles else {
            return Ok(());
        };
        match token {
            Token::Bearer(token) if allowed.iter().any(|role| token_for_role(role) == *token) => {
                Ok(())
            }
            Token::Bearer(_) => Err("role is not allowed to submit this command".to_string()),
            Token::Anonymous => Err("authentication required".to_string()),
        }
    }

    fn validate(&self, variables: &InputSet) -> Result<(), String> {
        for field in self.schema.fields() {
            match variables.get(&field.name) {
                None if field.required => {
                    return Err(format!("{} is required", field.name));
                }
                None => {}
                Some(value) if !field.field_type.accepts(value) => {
                    return Err(format!("{}: expected {}", field.name, field.field_type));
                }
                Some(Value::String(text)) if text.is_empty() => {
                    return Err(format!("{} must not be empty", field.name));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn record_effects(&self, variables: &InputSet) {
        let Some(correlation_id) = variables.get("id").and_then(Value::as_str) else {
            return;
        };
        let visible_at = Instant::now() + self.options.visibility_delay;
        let mut records = self.records.lock().expect("Backend lock poisoned");

        if self.options.record_snapshots {
            records.push(StoredRecord {
                key: QueryKey::snapshot(&self.options.entity, correlation_id).to_string(),
                record: Record::snapshot(variables.to_value()),
                visible_at,
            });
        }
        if self.options.record_events {
            records.push(StoredRecord {
                key: QueryKey::event(&self.options.entity, correlation_id).to_string(),
                record: Record::event(json!({
                    "name": self.options.event_name,
                    "payload": variables.to_value(),
                })),
                visible_at,
            });
        }
    }

    fn reject(&self, message: String) -> Rejection {
        if self.options.blank_rejections {
            Rejection::new("")
        } else {
            Rejection::new(message)
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryBackend {
    async fn token_for(&self, _identity: &str, role: &str) -> HarnessResult<Token> {
        Ok(Token::Bearer(token_for_role(role)))
    }

    fn client_for(&self, token: Token) -> Arc<dyn CommandTransport> {
        self.client(token)
    }
}

/// A caller of [`InMemoryBackend`] bound to one token
pub struct BackendClient {
    backend: InMemoryBackend,
    token: Token,
}

#[async_trait]
impl CommandTransport for BackendClient {
    async fn mutate(
        &self,
        variables: &InputSet,
        document: &MutationDocument,
    ) -> Result<Value, Rejection> {
        let backend = &self.backend;
        backend.submissions.fetch_add(1, Ordering::SeqCst);

        backend.authorize(&self.token).map_err(|m| backend.reject(m))?;
        if backend.options.validate {
            backend.validate(variables).map_err(|m| backend.reject(m))?;
        }

        backend.record_effects(variables);
        Ok(json!({ "accepted": true, "command": document.command() }))
    }

    async fn query(&self, key: &QueryKey) -> HarnessResult<Vec<Record>> {
        self.backend.queries.fetch_add(1, Ordering::SeqCst);
        if !self.backend.observe(key) {
            return Ok(Vec::new());
        }
        let now = Instant::now();
        let records = self.backend.records.lock().expect("Backend lock poisoned");

        Ok(records
            .iter()
            .filter(|stored| stored.key == key.as_str() && stored.visible_at <= now)
            .map(|stored| stored.record.clone())
            .collect())
    }
}

pub fn token_for_role(role: &str) -> String {
    format!("token-{}", role)
}

/// Records shaped like a fruit order read model
pub fn pear_and_water() -> Vec<Record> {
    vec![Record::event(json!({"fruit": "pear", "drink": "water"}))]
}

pub fn snapshot_then_event() -> Vec<Record> {
    vec![
        Record::snapshot(json!({"fruit": "pear"})),
        Record {
            kind: RecordKind::Event,
            value: json!({"name": EVENT_NAME}),
        },
    ]
}
