//! In-memory task repository.
//!
//! Keeps insertion order so listings are deterministic, and a per-worker
//! index that is rewritten whenever a recorded transition changes the
//! owner.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{DueWindow, Task, TaskId, TaskTransition},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::worker::domain::WorkerId;

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
    worker_index: HashMap<WorkerId, Vec<TaskId>>,
}

impl InMemoryTaskState {
    fn ordered<'a>(&'a self, ids: &'a [TaskId]) -> impl Iterator<Item = &'a Task> + 'a {
        ids.iter().filter_map(|id| self.tasks.get(id))
    }

    fn index_owner(&mut self, task: &Task) {
        if let Some(worker_id) = task.assignee() {
            self.worker_index.entry(worker_id).or_default().push(task.id());
        }
    }

    fn unindex_owner(&mut self, task_id: TaskId, worker_id: WorkerId) {
        if let Some(ids) = self.worker_index.get_mut(&worker_id) {
            ids.retain(|id| *id != task_id);
            if ids.is_empty() {
                self.worker_index.remove(&worker_id);
            }
        }
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.index_owner(task);
        state.order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn record(&self, task: &Task, _transition: &TaskTransition) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous_owner = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .assignee();

        if previous_owner != task.assignee() {
            if let Some(worker_id) = previous_owner {
                state.unindex_owner(task.id(), worker_id);
            }
            state.index_owner(task);
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered(&state.order).cloned().collect())
    }

    async fn list_for_worker(
        &self,
        worker_id: WorkerId,
        include_completed: bool,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let Some(ids) = state.worker_index.get(&worker_id) else {
            return Ok(Vec::new());
        };
        let mut tasks: Vec<Task> = state
            .ordered(ids)
            .filter(|task| include_completed || !task.progress().is_completed())
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.progress().is_completed());
        Ok(tasks)
    }

    async fn list_assignable(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered(&state.order)
            .filter(|task| task.assignee().is_none() && !task.progress().is_completed())
            .cloned()
            .collect())
    }

    async fn list_due(&self, window: DueWindow, today: NaiveDate) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered(&state.order)
            .filter(|task| task.is_in_window(window, today))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        if let Some(worker_id) = removed.assignee() {
            state.unindex_owner(id, worker_id);
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}
