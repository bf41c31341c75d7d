//! Collaborators behind the usecases.
//!
//! Each collaborator sits behind a trait so usecases can be tested with
//! in-memory doubles; [`Services`] wires the concrete implementations.

/// OpenAI-compatible inference server client
pub mod chat_backend;
/// In-flight download tracking
pub mod downloads;
/// In-process event bus
pub mod events;
/// Engine extension lookup
pub mod extensions;
/// Local model list
pub mod repository;

use std::{path::PathBuf, sync::Arc};

pub use chat_backend::{BackendError, ChatBackend, ChatMessage, HttpChatBackend, Role};
pub use downloads::{DownloadManager, DownloadState, InMemoryDownloadManager};
pub use events::{Event, EventBus, EventBusClosed, Subscription};
pub use extensions::{EngineExtension, ExtensionRegistry, StaticExtensionRegistry};
pub use repository::{
    FileModelRepository, ModelEntry, ModelRepository, ModelStatus, RepositoryError,
};
use tracing::{debug, instrument};

use crate::{CortexError, Result, config::Config, config::ConfigPaths};

/// Container for all collaborators
///
/// Built once at startup from the loaded configuration and shared through
/// `Arc` handles.
#[derive(Clone)]
pub struct Services {
    /// Configuration the services were built from
    pub config: Arc<Config>,
    /// Local model list
    pub models: Arc<dyn ModelRepository>,
    /// Download tracker
    pub downloads: Arc<dyn DownloadManager>,
    /// Engine extensions
    pub extensions: Arc<dyn ExtensionRegistry>,
    /// Inference server client
    pub chat_backend: Arc<dyn ChatBackend>,
    /// Event bus handle
    pub events: EventBus,
}

impl Services {
    /// Creates the default collaborators for `config`
    ///
    /// Must be called inside a tokio runtime because the event bus spawns its
    /// actor task.
    ///
    /// # Errors
    ///
    /// Returns an error if the data folder cannot be determined or the HTTP
    /// client for the inference server cannot be created.
    #[instrument(skip(config))]
    pub fn new(config: Config) -> Result<Self> {
        let models_dir = Self::models_dir(&config)?;
        debug!(models_dir = %models_dir.display(), "Creating services");

        let chat_backend = HttpChatBackend::new(&config.server.base_url()).map_err(|e| {
            CortexError::ConfigValidation {
                component: "server".to_string(),
                details: e.to_string(),
            }
        })?;

        Ok(Self {
            models: Arc::new(FileModelRepository::new(models_dir)),
            downloads: Arc::new(InMemoryDownloadManager::new()),
            extensions: Arc::new(StaticExtensionRegistry::with_builtin_engines()),
            chat_backend: Arc::new(chat_backend),
            events: EventBus::new(),
            config: Arc::new(config),
        })
    }

    fn models_dir(config: &Config) -> Result<PathBuf> {
        Ok(ConfigPaths::models_dir(&config.data_dir()?))
    }
}
