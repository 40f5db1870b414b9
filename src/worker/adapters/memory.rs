//! In-memory worker repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::worker::{
    domain::{Worker, WorkerId},
    ports::{WorkerRepository, WorkerRepositoryError, WorkerRepositoryResult},
};

/// Thread-safe in-memory worker repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkerRepository {
    workers: Arc<RwLock<HashMap<WorkerId, Worker>>>,
}

impl InMemoryWorkerRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> WorkerRepositoryError {
    WorkerRepositoryError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkerRepository for InMemoryWorkerRepository {
    async fn store(&self, worker: &Worker) -> WorkerRepositoryResult<Worker> {
        let mut workers = self.workers.write().map_err(lock_error)?;
        if workers.contains_key(&worker.id()) {
            return Err(WorkerRepositoryError::DuplicateWorker(worker.id()));
        }
        workers.insert(worker.id(), worker.clone());
        Ok(worker.clone())
    }

    async fn update(&self, worker: &Worker) -> WorkerRepositoryResult<Worker> {
        let mut workers = self.workers.write().map_err(lock_error)?;
        let slot = workers
            .get_mut(&worker.id())
            .ok_or(WorkerRepositoryError::NotFound(worker.id()))?;
        *slot = worker.clone();
        Ok(worker.clone())
    }

    async fn find_by_id(&self, id: WorkerId) -> WorkerRepositoryResult<Option<Worker>> {
        let workers = self.workers.read().map_err(lock_error)?;
        Ok(workers.get(&id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> WorkerRepositoryResult<Vec<Worker>> {
        let workers = self.workers.read().map_err(lock_error)?;
        let mut listed: Vec<Worker> = workers
            .values()
            .filter(|worker| include_inactive || worker.is_active())
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            a.name()
                .as_str()
                .cmp(b.name().as_str())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(listed)
    }
}
