//! NATS request/reply transport for backends under test
//!
//! Commands, queries and token requests are JSON request/reply exchanges:
//!
//! | Subject | Request | Reply |
//! |---|---|---|
//! | `{root}.command.{Command}` | `{document, command, variables, token}` | `{"data": ..}` or `{"error": {"message": ..}}` |
//! | `{root}.query` | `{key}` | `[record, ..]` or `{"error": {"message": ..}}` |
//! | `{root}.identity.token` | `{identity, role}` | `{"token": ..}` or `{"error": {"message": ..}}` |

use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::Record;
use crate::errors::{HarnessError, HarnessResult};
use crate::keys::QueryKey;
use crate::mutation::MutationDocument;
use crate::subjects::{Channel, SubjectBuilder, HARNESS_ROOT};
use crate::transport::{CommandTransport, IdentityProvider, Rejection, Token};
use crate::variables::InputSet;

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
    /// Root of every request subject
    pub subject_root: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cim-command-harness".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
            subject_root: HARNESS_ROOT.to_string(),
        }
    }
}

/// NATS client wrapper providing JSON request/reply
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
    subjects: SubjectBuilder,
}

impl NatsClient {
    /// Create a new NATS client with the given configuration
    pub async fn new(config: NatsConfig) -> HarnessResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| HarnessError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self {
            client,
            subjects: SubjectBuilder::new(config.subject_root),
        })
    }

    /// Send a JSON request and return the raw reply payload
    pub async fn request<T>(&self, subject: &str, request: &T) -> HarnessResult<Vec<u8>>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(request)?;

        let response = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .map_err(|e| HarnessError::NatsRequest(e.to_string()))?;

        debug!("Received reply on subject: {}", subject);
        Ok(response.payload.to_vec())
    }

    pub fn subjects(&self) -> &SubjectBuilder {
        &self.subjects
    }

    /// Get the underlying NATS client for advanced operations
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    command: &'a str,
    document: &'a str,
    variables: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    key: &'a QueryKey,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    identity: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ReplyError>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryReply {
    Records(Vec<Record>),
    Failed { error: ReplyError },
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<ReplyError>,
}

/// Interpret a command reply; anything but a clean `data` reply is a rejection
pub fn decode_command_reply(payload: &[u8]) -> Result<Value, Rejection> {
    let reply: CommandReply = serde_json::from_slice(payload)
        .map_err(|e| Rejection::new(format!("malformed command reply: {}", e)))?;

    match reply {
        CommandReply {
            error: Some(error), ..
        } => Err(Rejection::new(error.message)),
        CommandReply { data, .. } => Ok(data.unwrap_or(Value::Null)),
    }
}

/// Interpret a query reply for `key`
pub fn decode_query_reply(key: &QueryKey, payload: &[u8]) -> HarnessResult<Vec<Record>> {
    let reply: QueryReply = serde_json::from_slice(payload)
        .map_err(|e| HarnessError::Deserialization(format!("query reply for {}: {}", key, e)))?;

    match reply {
        QueryReply::Records(records) => Ok(records),
        QueryReply::Failed { error } => Err(HarnessError::Query {
            key: key.to_string(),
            message: error.message,
        }),
    }
}

fn decode_token_reply(payload: &[u8]) -> HarnessResult<Token> {
    let reply: TokenReply = serde_json::from_slice(payload)
        .map_err(|e| HarnessError::Deserialization(format!("token reply: {}", e)))?;

    match reply {
        TokenReply {
            error: Some(error), ..
        } => Err(HarnessError::Identity(error.message)),
        TokenReply {
            token: Some(token), ..
        } => Ok(Token::Bearer(token)),
        TokenReply { .. } => Err(HarnessError::Identity("reply carried no token".to_string())),
    }
}

/// [`CommandTransport`] over NATS request/reply, bound to one token
#[derive(Clone)]
pub struct NatsTransport {
    client: NatsClient,
    token: Token,
}

impl NatsTransport {
    pub fn new(client: NatsClient, token: Token) -> Self {
        Self { client, token }
    }

    /// Transport that submits without credentials
    pub fn anonymous(client: NatsClient) -> Self {
        Self::new(client, Token::Anonymous)
    }
}

#[async_trait]
impl CommandTransport for NatsTransport {
    async fn mutate(
        &self,
        variables: &InputSet,
        document: &MutationDocument,
    ) -> Result<Value, Rejection> {
        let subject = self.client.subjects().command(document.command());
        let request = CommandRequest {
            command: document.command(),
            document: document.text(),
            variables: variables.to_value(),
            token: self.token.bearer(),
        };

        let payload = self
            .client
            .request(&subject, &request)
            .await
            .map_err(|e| Rejection::new(e.to_string()))?;

        decode_command_reply(&payload)
    }

    async fn query(&self, key: &QueryKey) -> HarnessResult<Vec<Record>> {
        let subject = self.client.subjects().channel(Channel::Query);
        let payload = self
            .client
            .request(&subject, &QueryRequest { key })
            .await
            .map_err(|e| HarnessError::Query {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        decode_query_reply(key, &payload)
    }
}

/// [`IdentityProvider`] that requests tokens over NATS
#[derive(Clone)]
pub struct NatsIdentityProvider {
    client: NatsClient,
}

impl NatsIdentityProvider {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for NatsIdentityProvider {
    async fn token_for(&self, identity: &str, role: &str) -> HarnessResult<Token> {
        let subject = self.client.subjects().channel(Channel::Identity);
        let payload = self
            .client
            .request(&subject, &TokenRequest { identity, role })
            .await
            .map_err(|e| HarnessError::Identity(e.to_string()))?;

        decode_token_reply(&payload)
    }

    fn client_for(&self, token: Token) -> Arc<dyn CommandTransport> {
        Arc::new(NatsTransport::new(self.client.clone(), token))
    }
}
