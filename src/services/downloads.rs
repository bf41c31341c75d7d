use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Progress of one model download
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadState {
    /// Model being downloaded
    pub model_id: String,
    /// Bytes received so far
    pub downloaded: u64,
    /// Expected total size, when known
    pub total: Option<u64>,
}

impl DownloadState {
    /// Completion ratio in `0.0..=1.0`, if the total size is known
    pub fn progress(&self) -> Option<f64> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| (self.downloaded as f64 / total as f64).min(1.0))
    }
}

/// Tracks in-flight model downloads
///
/// Transfer and resume logic live elsewhere; the manager only knows which
/// downloads are active and can abort them.
#[async_trait]
pub trait DownloadManager: Send + Sync {
    /// Downloads currently in flight
    async fn active(&self) -> Vec<DownloadState>;

    /// Whether a download for the model is in flight
    async fn is_downloading(&self, model_id: &str) -> bool;

    /// Aborts the model's download. Returns `true` if one was running.
    async fn abort(&self, model_id: &str) -> bool;
}

/// In-memory download tracker
#[derive(Default)]
pub struct InMemoryDownloadManager {
    downloads: RwLock<HashMap<String, DownloadState>>,
}

impl InMemoryDownloadManager {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking or updates a download
    pub async fn track(&self, state: DownloadState) {
        debug!(model = %state.model_id, downloaded = state.downloaded, "Tracking download");
        self.downloads
            .write()
            .await
            .insert(state.model_id.clone(), state);
    }
}

#[async_trait]
impl DownloadManager for InMemoryDownloadManager {
    async fn active(&self) -> Vec<DownloadState> {
        let mut states: Vec<_> = self.downloads.read().await.values().cloned().collect();
        states.sort_by(|a, b| a.model_id.cmp(&b.model_id));
        states
    }

    async fn is_downloading(&self, model_id: &str) -> bool {
        self.downloads.read().await.contains_key(model_id)
    }

    async fn abort(&self, model_id: &str) -> bool {
        let aborted = self.downloads.write().await.remove(model_id).is_some();
        if aborted {
            info!(model = %model_id, "Aborted download");
        }
        aborted
    }
}
