use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use serde_json::json;
use tokio::fs;
use tracing::{info, instrument, warn};

use super::UsecaseError;
use crate::services::{
    DownloadManager, Event, EventBus, ExtensionRegistry, ModelEntry, ModelRepository,
    extensions::LLAMACPP,
};

/// Model lifecycle operations
#[async_trait]
pub trait ModelUsecases: Send + Sync {
    /// All local models
    async fn list_models(&self) -> Result<Vec<ModelEntry>, UsecaseError>;

    /// One local model by id or alias
    async fn get_model(&self, model_id: &str) -> Result<ModelEntry, UsecaseError>;

    /// Removes a model and returns the confirmation message
    async fn remove_model(&self, model_id: &str) -> Result<String, UsecaseError>;

    /// Sets the model's unique alias
    async fn set_alias(&self, model_id: &str, alias: &str) -> Result<ModelEntry, UsecaseError>;

    /// Registers an existing model file or folder under `model_id`
    ///
    /// `engine` defaults to llama.cpp. The files stay where they are.
    async fn import_model(
        &self,
        model_id: &str,
        path: &Path,
        engine: Option<&str>,
    ) -> Result<ModelEntry, UsecaseError>;
}

/// [`ModelUsecases`] over the repository, download tracker, engine
/// extensions and event bus
pub struct LocalModelUsecases {
    models: Arc<dyn ModelRepository>,
    downloads: Arc<dyn DownloadManager>,
    extensions: Arc<dyn ExtensionRegistry>,
    events: EventBus,
}

impl LocalModelUsecases {
    /// Creates the usecases from their collaborators
    pub fn new(
        models: Arc<dyn ModelRepository>,
        downloads: Arc<dyn DownloadManager>,
        extensions: Arc<dyn ExtensionRegistry>,
        events: EventBus,
    ) -> Self {
        Self {
            models,
            downloads,
            extensions,
            events,
        }
    }

    async fn emit(&self, name: &str, payload: serde_json::Value) {
        if let Err(e) = self.events.publish(Event::new(name, payload)).await {
            warn!(event = name, error = %e, "Dropping event");
        }
    }
}

#[async_trait]
impl ModelUsecases for LocalModelUsecases {
    async fn list_models(&self) -> Result<Vec<ModelEntry>, UsecaseError> {
        Ok(self.models.list().await?)
    }

    async fn get_model(&self, model_id: &str) -> Result<ModelEntry, UsecaseError> {
        self.models
            .find(model_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound(model_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn remove_model(&self, model_id: &str) -> Result<String, UsecaseError> {
        let entry = self.get_model(model_id).await?;

        if self.downloads.abort(&entry.id).await {
            info!(model = %entry.id, "Aborted download before removal");
        }

        let removed = self.models.remove(&entry.id).await?;
        self.emit("model.removed", json!({ "id": removed.id })).await;

        Ok(format!("The model {model_id} was deleted"))
    }

    #[instrument(skip(self))]
    async fn set_alias(&self, model_id: &str, alias: &str) -> Result<ModelEntry, UsecaseError> {
        if alias.trim().is_empty() {
            return Err(UsecaseError::Conflict("Alias must not be empty".to_string()));
        }

        let updated = self.models.set_alias(model_id, alias).await?;
        self.emit(
            "model.updated",
            json!({ "id": updated.id, "alias": updated.alias }),
        )
        .await;

        Ok(updated)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn import_model(
        &self,
        model_id: &str,
        path: &Path,
        engine: Option<&str>,
    ) -> Result<ModelEntry, UsecaseError> {
        if model_id.trim().is_empty() {
            return Err(UsecaseError::Conflict("Model id must not be empty".to_string()));
        }

        let engine = engine.unwrap_or(LLAMACPP);
        if self.extensions.engine(engine).is_none() {
            return Err(UsecaseError::Configuration(format!(
                "Engine {engine} is not registered"
            )));
        }

        let resolved = fs::canonicalize(path).await.map_err(|e| {
            UsecaseError::Io(format!(
                "Error importing model path '{}': {e}",
                path.display()
            ))
        })?;

        let entry = ModelEntry::new(model_id, engine, resolved);
        self.models.add(entry.clone()).await?;
        info!(model = %entry.id, engine = %entry.engine, "Imported model");

        self.emit(
            "model.imported",
            json!({ "id": entry.id, "engine": entry.engine }),
        )
        .await;

        Ok(entry)
    }
}
