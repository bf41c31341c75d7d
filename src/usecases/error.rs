use thiserror::Error;

use crate::services::{BackendError, RepositoryError};

/// Failures reported by the usecase facade
///
/// The message of each variant is what the operator sees on stderr.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsecaseError {
    /// The model does not exist locally
    #[error("Model {0} not found")]
    NotFound(String),

    /// Reading or deleting local files failed
    #[error("{0}")]
    Io(String),

    /// The local setup does not allow the operation
    #[error("{0}")]
    Configuration(String),

    /// The inference server could not be used
    #[error("{0}")]
    BackendUnavailable(String),

    /// The request conflicts with existing state
    #[error("{0}")]
    Conflict(String),
}

impl From<RepositoryError> for UsecaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => UsecaseError::NotFound(id),
            RepositoryError::AlreadyExists(_) | RepositoryError::AliasTaken { .. } => {
                UsecaseError::Conflict(error.to_string())
            }
            RepositoryError::Storage(e) => UsecaseError::Io(e.to_string()),
        }
    }
}

impl From<BackendError> for UsecaseError {
    fn from(error: BackendError) -> Self {
        UsecaseError::BackendUnavailable(error.to_string())
    }
}
