//! Service layer for worker registration, edits and soft deletion.

use crate::error::ErrorKind;
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::worker::{
    domain::{Worker, WorkerDomainError, WorkerId, WorkerName, WorkerProfile, WorkerSummary},
    ports::{WorkerRepository, WorkerRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for registering a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkerRequest {
    name: String,
    profile: WorkerProfile,
}

impl CreateWorkerRequest {
    /// Creates a request with the required display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: WorkerProfile::default(),
        }
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.profile.role = role.into();
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.profile.phone = Some(phone.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.profile.email = Some(email.into());
        self
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.profile.notes = notes.into();
        self
    }
}

/// Partial update of a worker. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateWorkerRequest {
    name: Option<String>,
    role: Option<String>,
    phone: Option<Option<String>>,
    email: Option<Option<String>>,
    notes: Option<String>,
}

impl UpdateWorkerRequest {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the worker.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets or clears the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Sets or clears the email address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    /// Replaces the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn apply_to(self, worker: &mut Worker, clock: &impl Clock) -> Result<(), WorkerDomainError> {
        if let Some(raw) = self.name {
            worker.rename(WorkerName::new(raw)?, clock);
        }
        let current = worker.profile();
        let profile = WorkerProfile {
            role: self.role.unwrap_or_else(|| current.role.clone()),
            phone: self.phone.unwrap_or_else(|| current.phone.clone()),
            email: self.email.unwrap_or_else(|| current.email.clone()),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        };
        if &profile != worker.profile() {
            worker.update_profile(profile, clock);
        }
        Ok(())
    }
}

/// Service-level errors for worker directory operations.
#[derive(Debug, Error)]
pub enum WorkerDirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkerDomainError),
    /// Worker repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkerRepositoryError),
    /// Task lookup for the summary failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The worker does not exist.
    #[error("worker not found: {0}")]
    NotFound(WorkerId),
}

impl WorkerDirectoryError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
            Self::Tasks(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for worker directory operations.
pub type WorkerDirectoryResult<T> = Result<T, WorkerDirectoryError>;

/// Worker directory orchestration service.
#[derive(Clone)]
pub struct WorkerDirectoryService<W, T, C>
where
    W: WorkerRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    workers: Arc<W>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<W, T, C> WorkerDirectoryService<W, T, C>
where
    W: WorkerRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new worker directory service.
    #[must_use]
    pub const fn new(workers: Arc<W>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            workers,
            tasks,
            clock,
        }
    }

    /// Registers an active worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError::Domain`] for a blank name or
    /// [`WorkerDirectoryError::Repository`] when the store rejects it.
    pub async fn create(&self, request: CreateWorkerRequest) -> WorkerDirectoryResult<Worker> {
        let name = WorkerName::new(request.name)?;
        let worker = Worker::new(name, request.profile, &*self.clock);
        let stored = self.workers.store(&worker).await.inspect_err(|err| {
            warn!(error = %err, kind = %err.kind(), "worker registration failed");
        })?;
        info!(worker_id = %stored.id(), name = %stored.name(), "registered worker");
        Ok(stored)
    }

    /// Returns a worker, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError::NotFound`] for unknown workers.
    pub async fn find(&self, worker_id: WorkerId) -> WorkerDirectoryResult<Worker> {
        self.workers
            .find_by_id(worker_id)
            .await?
            .ok_or(WorkerDirectoryError::NotFound(worker_id))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError::Domain`] for a blank replacement name
    /// and [`WorkerDirectoryError::NotFound`] for unknown workers.
    pub async fn update(
        &self,
        worker_id: WorkerId,
        request: UpdateWorkerRequest,
    ) -> WorkerDirectoryResult<Worker> {
        let mut worker = self.find(worker_id).await?;
        request.apply_to(&mut worker, &*self.clock)?;
        Ok(self.workers.update(&worker).await?)
    }

    /// Soft-deletes a worker. Their tasks, completed or not, keep the
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError::NotFound`] for unknown workers.
    pub async fn deactivate(&self, worker_id: WorkerId) -> WorkerDirectoryResult<Worker> {
        let mut worker = self.find(worker_id).await?;
        if !worker.is_active() {
            return Ok(worker);
        }
        worker.deactivate(&*self.clock);
        let stored = self.workers.update(&worker).await?;
        info!(%worker_id, "deactivated worker");
        Ok(stored)
    }

    /// Restores a deactivated worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError::NotFound`] for unknown workers.
    pub async fn activate(&self, worker_id: WorkerId) -> WorkerDirectoryResult<Worker> {
        let mut worker = self.find(worker_id).await?;
        if worker.is_active() {
            return Ok(worker);
        }
        worker.activate(&*self.clock);
        let stored = self.workers.update(&worker).await?;
        info!(%worker_id, "reactivated worker");
        Ok(stored)
    }

    /// Lists workers with their open task counts.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDirectoryError`] when either store fails.
    pub async fn list(&self, include_inactive: bool) -> WorkerDirectoryResult<Vec<WorkerSummary>> {
        let workers = self.workers.list(include_inactive).await?;
        let mut summaries = Vec::with_capacity(workers.len());
        for worker in workers {
            let task_count = self.tasks.list_for_worker(worker.id(), false).await?.len();
            summaries.push(WorkerSummary { worker, task_count });
        }
        Ok(summaries)
    }
}
