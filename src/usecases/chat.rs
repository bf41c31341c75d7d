use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::UsecaseError;
use crate::{
    platform::Platform,
    services::{
        ChatBackend, ChatMessage, DownloadManager, Event, EventBus, ExtensionRegistry,
        ModelRepository,
    },
    wizard::RuntimeConfiguration,
};

/// An open conversation with a loaded model
#[derive(Debug)]
pub struct ChatSession {
    /// Model the session talks to
    pub model_id: String,
    /// Engine that runs the model
    pub engine: String,
    /// When the session was opened
    pub started_at: DateTime<Utc>,
    history: Mutex<Vec<ChatMessage>>,
}

impl ChatSession {
    /// Opens an empty session
    pub fn new(model_id: &str, engine: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            engine: engine.to_string(),
            started_at: Utc::now(),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Messages exchanged so far
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }
}

/// Chat operations
#[async_trait]
pub trait ChatUsecases: Send + Sync {
    /// Opens a session with a local model
    async fn start_chat(&self, model_id: &str) -> Result<ChatSession, UsecaseError>;

    /// Sends one operator message and returns the reply text
    async fn send(&self, session: &ChatSession, message: &str) -> Result<String, UsecaseError>;
}

/// [`ChatUsecases`] over the local setup and an inference server
pub struct LocalChatUsecases {
    platform: Platform,
    runtime: RuntimeConfiguration,
    models: Arc<dyn ModelRepository>,
    downloads: Arc<dyn DownloadManager>,
    extensions: Arc<dyn ExtensionRegistry>,
    backend: Arc<dyn ChatBackend>,
    events: EventBus,
}

/// Collaborators needed by [`LocalChatUsecases`]
pub struct ChatDependencies {
    /// Local model list
    pub models: Arc<dyn ModelRepository>,
    /// Download tracker
    pub downloads: Arc<dyn DownloadManager>,
    /// Engine extensions
    pub extensions: Arc<dyn ExtensionRegistry>,
    /// Inference server
    pub backend: Arc<dyn ChatBackend>,
    /// Event bus
    pub events: EventBus,
}

impl LocalChatUsecases {
    /// Creates the usecases for a host and its configured runtime
    pub fn new(
        platform: Platform,
        runtime: RuntimeConfiguration,
        dependencies: ChatDependencies,
    ) -> Self {
        Self {
            platform,
            runtime,
            models: dependencies.models,
            downloads: dependencies.downloads,
            extensions: dependencies.extensions,
            backend: dependencies.backend,
            events: dependencies.events,
        }
    }

    fn check_runtime(&self) -> Result<(), UsecaseError> {
        if self.runtime.is_empty() && !self.platform.is_apple_desktop() {
            return Err(UsecaseError::Configuration(
                "The runtime is not configured. Run `cortex init` first".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatUsecases for LocalChatUsecases {
    #[instrument(skip(self))]
    async fn start_chat(&self, model_id: &str) -> Result<ChatSession, UsecaseError> {
        let model = self
            .models
            .find(model_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound(model_id.to_string()))?;

        if self.downloads.is_downloading(&model.id).await {
            return Err(UsecaseError::Configuration(format!(
                "Model {} is still downloading",
                model.id
            )));
        }

        let engine = self.extensions.engine(&model.engine).ok_or_else(|| {
            UsecaseError::Configuration(format!("Engine {} is not registered", model.engine))
        })?;

        if !engine.supports(self.platform) {
            return Err(UsecaseError::Configuration(format!(
                "Engine {} is not supported on {}",
                engine.display_name, self.platform
            )));
        }

        self.check_runtime()?;

        self.backend.health().await?;
        self.backend.load_model(&model.id, &engine.name).await?;

        let session = ChatSession::new(&model.id, &engine.name);
        info!(model = %session.model_id, engine = %session.engine, "Chat session started");

        let event = Event::new(
            "chat.started",
            json!({ "model": session.model_id, "engine": session.engine }),
        );
        if let Err(e) = self.events.publish(event).await {
            warn!(error = %e, "Dropping chat.started event");
        }

        Ok(session)
    }

    #[instrument(skip(self, session, message), fields(model = %session.model_id))]
    async fn send(&self, session: &ChatSession, message: &str) -> Result<String, UsecaseError> {
        let mut history = session.history.lock().await;
        history.push(ChatMessage::user(message));

        let reply = match self.backend.complete(&session.model_id, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                history.pop();
                return Err(e.into());
            }
        };

        let content = reply.content.clone();
        history.push(reply);
        Ok(content)
    }
}
