use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, instrument};

use crate::CortexError;

const MODEL_LIST_FILE: &str = "model.list.json";

/// Lifecycle state of a local model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// Downloaded and ready to be loaded
    #[default]
    Ready,
    /// Currently loaded by an engine
    Running,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Ready => write!(f, "ready"),
            ModelStatus::Running => write!(f, "running"),
        }
    }
}

/// One entry of the local model list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Unique model identifier
    pub id: String,

    /// Optional unique alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Engine that runs the model, e.g. `llamacpp`
    pub engine: String,

    /// Model file or folder on disk
    pub path: PathBuf,

    /// Current status
    #[serde(default)]
    pub status: ModelStatus,
}

impl ModelEntry {
    /// Creates a ready entry
    pub fn new(id: &str, engine: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            alias: None,
            engine: engine.to_string(),
            path: path.into(),
            status: ModelStatus::Ready,
        }
    }

    /// Whether `key` names this model by id or alias
    pub fn answers_to(&self, key: &str) -> bool {
        self.id == key || self.alias.as_deref() == Some(key)
    }
}

/// Errors raised by a model repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No model with the given id or alias
    #[error("model '{0}' not found")]
    NotFound(String),

    /// A model with the id already exists
    #[error("model '{0}' already exists")]
    AlreadyExists(String),

    /// The alias already names another model
    #[error("alias '{alias}' is already used by model '{owner}'")]
    AliasTaken {
        /// Requested alias
        alias: String,
        /// Model currently holding it
        owner: String,
    },

    /// Reading or writing the model list failed
    #[error(transparent)]
    Storage(#[from] CortexError),
}

/// Persistent store of local models
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// All models in insertion order
    async fn list(&self) -> Result<Vec<ModelEntry>, RepositoryError>;

    /// Finds a model by id or alias
    async fn find(&self, key: &str) -> Result<Option<ModelEntry>, RepositoryError>;

    /// Adds a new model
    async fn add(&self, entry: ModelEntry) -> Result<(), RepositoryError>;

    /// Removes a model entry together with the files it owns
    async fn remove(&self, id: &str) -> Result<ModelEntry, RepositoryError>;

    /// Assigns a unique alias to a model
    async fn set_alias(&self, id: &str, alias: &str) -> Result<ModelEntry, RepositoryError>;
}

/// Model repository backed by `model.list.json` inside the models folder
///
/// Files are only deleted on removal when they live inside the models folder;
/// imported models that point elsewhere keep their files.
pub struct FileModelRepository {
    models_dir: PathBuf,
    lock: Mutex<()>,
}

impl FileModelRepository {
    /// Creates a repository rooted at `models_dir`
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the model list file
    pub fn list_path(&self) -> PathBuf {
        self.models_dir.join(MODEL_LIST_FILE)
    }

    async fn read_entries(&self) -> Result<Vec<ModelEntry>, CortexError> {
        let path = self.list_path();

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Model list missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(CortexError::io_at(e, &path)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| CortexError::ModelListParse {
            path: path.clone(),
            details: e.to_string(),
        })
    }

    async fn write_entries(&self, entries: &[ModelEntry]) -> Result<(), CortexError> {
        let path = self.list_path();

        fs::create_dir_all(&self.models_dir)
            .await
            .map_err(|e| CortexError::io_at(e, &self.models_dir))?;

        let body =
            serde_json::to_string_pretty(entries).map_err(|e| CortexError::ModelListParse {
                path: path.clone(),
                details: e.to_string(),
            })?;

        fs::write(&path, body)
            .await
            .map_err(|e| CortexError::io_at(e, &path))
    }

    async fn delete_owned_files(&self, entry: &ModelEntry) -> Result<(), CortexError> {
        let path = &entry.path;

        if !owned_by(path, &self.models_dir) {
            info!(model = %entry.id, path = %path.display(), "Keeping files outside the models folder");
            return Ok(());
        }

        let resolved = match fs::canonicalize(path).await {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(model = %entry.id, path = %path.display(), "Model files already gone");
                return Ok(());
            }
            Err(e) => return Err(CortexError::io_at(e, path)),
        };
        let models_dir = fs::canonicalize(&self.models_dir)
            .await
            .map_err(|e| CortexError::io_at(e, &self.models_dir))?;

        if !owned_by(&resolved, &models_dir) {
            info!(model = %entry.id, path = %resolved.display(), "Keeping files resolving outside the models folder");
            return Ok(());
        }

        let result = match fs::metadata(&resolved).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&resolved).await,
            Ok(_) => fs::remove_file(&resolved).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| CortexError::io_at(e, &resolved))
    }
}

/// Whether `path` names something strictly below `models_dir`.
///
/// Only plain name components may follow the prefix, so `..` cannot climb
/// back out of the folder.
fn owned_by(path: &Path, models_dir: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(models_dir) else {
        return false;
    };

    let mut components = relative.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl ModelRepository for FileModelRepository {
    async fn list(&self) -> Result<Vec<ModelEntry>, RepositoryError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?)
    }

    async fn find(&self, key: &str) -> Result<Option<ModelEntry>, RepositoryError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;

        Ok(entries.into_iter().find(|entry| entry.answers_to(key)))
    }

    #[instrument(skip(self, entry), fields(model = %entry.id))]
    async fn add(&self, entry: ModelEntry) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(RepositoryError::AlreadyExists(entry.id));
        }

        entries.push(entry);
        self.write_entries(&entries).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<ModelEntry, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        let position = entries
            .iter()
            .position(|entry| entry.answers_to(id))
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let removed = entries.remove(position);
        self.write_entries(&entries).await?;
        self.delete_owned_files(&removed).await?;

        info!(model = %removed.id, "Removed model");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn set_alias(&self, id: &str, alias: &str) -> Result<ModelEntry, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        if let Some(owner) = entries
            .iter()
            .find(|entry| entry.answers_to(alias) && entry.id != id)
        {
            return Err(RepositoryError::AliasTaken {
                alias: alias.to_string(),
                owner: owner.id.clone(),
            });
        }

        let entry = entries
            .iter_mut()
            .find(|entry| entry.answers_to(id))
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        entry.alias = Some(alias.to_string());
        let updated = entry.clone();

        self.write_entries(&entries).await?;
        Ok(updated)
    }
}
