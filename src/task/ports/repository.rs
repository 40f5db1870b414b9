//! Repository port for task persistence, lookup and transition recording.

use crate::error::ErrorKind;
use crate::task::domain::{DueWindow, Task, TaskId, TaskTransition};
use crate::worker::domain::WorkerId;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Records `transition`, already applied to `task`, and returns the
    /// stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::Conflict`] when the store refuses
    /// the change.
    async fn record(&self, task: &Task, transition: &TaskTransition) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists every task.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists tasks owned by `worker_id`, open ones first.
    async fn list_for_worker(
        &self,
        worker_id: WorkerId,
        include_completed: bool,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists open tasks nobody owns.
    async fn list_assignable(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists tasks in a due-date window relative to `today`.
    async fn list_due(&self, window: DueWindow, today: NaiveDate) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store refused the change because of conflicting state.
    #[error("task store reported a conflict: {0}")]
    Conflict(String),

    /// The store refused the payload.
    #[error("task store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or failed.
    #[error("task store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps an infrastructure error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTask(_) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected(_) => ErrorKind::Validation,
            Self::Unavailable(_) => ErrorKind::Network,
        }
    }
}
