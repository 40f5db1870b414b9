//! Repository port for worker persistence and lookup.

use crate::error::ErrorKind;
use crate::worker::domain::{Worker, WorkerId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for worker repository operations.
pub type WorkerRepositoryResult<T> = Result<T, WorkerRepositoryError>;

/// Worker persistence contract.
#[async_trait]
pub trait WorkerRepository: Send + Sync {
    /// Stores a new worker and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRepositoryError::DuplicateWorker`] when the identifier
    /// already exists.
    async fn store(&self, worker: &Worker) -> WorkerRepositoryResult<Worker>;

    /// Persists changes to an existing worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerRepositoryError::NotFound`] when the worker does not
    /// exist, or [`WorkerRepositoryError::Conflict`] when the store refuses
    /// the change.
    async fn update(&self, worker: &Worker) -> WorkerRepositoryResult<Worker>;

    /// Finds a worker by identifier, active or not.
    async fn find_by_id(&self, id: WorkerId) -> WorkerRepositoryResult<Option<Worker>>;

    /// Lists workers ordered by name; inactive workers only when requested.
    async fn list(&self, include_inactive: bool) -> WorkerRepositoryResult<Vec<Worker>>;
}

/// Errors returned by worker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkerRepositoryError {
    /// A worker with the same identifier already exists.
    #[error("duplicate worker identifier: {0}")]
    DuplicateWorker(WorkerId),

    /// The worker was not found.
    #[error("worker not found: {0}")]
    NotFound(WorkerId),

    /// The store refused the change because of conflicting state.
    #[error("worker store reported a conflict: {0}")]
    Conflict(String),

    /// The store refused the write.
    #[error("worker store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or failed.
    #[error("worker store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkerRepositoryError {
    /// Wraps an infrastructure error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateWorker(_) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected(_) => ErrorKind::Validation,
            Self::Unavailable(_) => ErrorKind::Network,
        }
    }
}
