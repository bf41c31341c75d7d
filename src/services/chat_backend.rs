use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// Operator input
    User,
    /// Model output
    Assistant,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Operator message
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }
}

/// Errors talking to the inference server
#[derive(Error, Debug)]
pub enum BackendError {
    /// The server could not be reached
    #[error("inference server at {url} is unavailable: {details}")]
    Unavailable {
        /// Server base URL
        url: String,
        /// Transport error
        details: String,
    },

    /// The server answered with an error or an unexpected body
    #[error("inference request failed: {0}")]
    Request(String),

    /// The HTTP client could not be set up
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Inference server the chat usecase talks to
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Checks that the server is up
    async fn health(&self) -> Result<(), BackendError>;

    /// Loads a model into the given engine
    async fn load_model(&self, model_id: &str, engine: &str) -> Result<(), BackendError>;

    /// Sends the conversation and returns the assistant's reply
    async fn complete(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatMessage, BackendError>;
}

#[derive(Serialize)]
struct LoadModelRequest<'a> {
    model: &'a str,
    engine: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// OpenAI-compatible HTTP backend
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a backend for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Client`] if the TLS backend or resolver cannot
    /// be initialized.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn unavailable(&self, error: reqwest::Error) -> BackendError {
        BackendError::Unavailable {
            url: self.base_url.clone(),
            details: error.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn health(&self) -> Result<(), BackendError> {
        self.client
            .get(self.url("/healthz"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?
            .error_for_status()
            .map_err(|e| self.unavailable(e))?;

        debug!("Inference server is healthy");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_model(&self, model_id: &str, engine: &str) -> Result<(), BackendError> {
        self.client
            .post(self.url("/inferences/server/loadmodel"))
            .json(&LoadModelRequest {
                model: model_id,
                engine,
            })
            .send()
            .await
            .map_err(|e| self.unavailable(e))?
            .error_for_status()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    async fn complete(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatMessage, BackendError> {
        let response: CompletionResponse = self
            .client
            .post(self.url("/v1/chat/completions"))
            .json(&CompletionRequest {
                model: model_id,
                messages,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.unavailable(e))?
            .error_for_status()
            .map_err(|e| BackendError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| BackendError::Request("response contained no choices".to_string()))
    }
}
