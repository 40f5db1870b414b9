//! Service layer for task creation, transitions and day-planning lists.

use crate::error::ErrorKind;
use crate::task::{
    domain::{
        DueWindow, Recurrence, Task, TaskAction, TaskCategory, TaskDetails, TaskDomainError,
        TaskId, TaskPriority, TaskState, TaskTitle, TaskTransition,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::worker::{
    domain::WorkerId,
    ports::{WorkerRepository, WorkerRepositoryError},
};
use chrono::{NaiveDate, NaiveTime};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification published after every successful task change.
///
/// `worker_ids` names every worker whose task list is affected, so both the
/// previous and the new owner appear on reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    /// Changed task.
    pub task_id: TaskId,
    /// Workers whose task lists should be re-fetched.
    pub worker_ids: Vec<WorkerId>,
    /// State after the change; `None` once the task is deleted.
    pub state: Option<TaskState>,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    category: TaskCategory,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    due_time: Option<NaiveTime>,
    recurrence: Recurrence,
    notify_email: bool,
    assignee: Option<WorkerId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: TaskCategory::default(),
            priority: TaskPriority::default(),
            due_date: None,
            due_time: None,
            recurrence: Recurrence::default(),
            notify_email: false,
            assignee: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the due time.
    #[must_use]
    pub const fn with_due_time(mut self, due_time: NaiveTime) -> Self {
        self.due_time = Some(due_time);
        self
    }

    /// Sets the repeat schedule.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Enables reminder emails.
    #[must_use]
    pub const fn with_notify_email(mut self, notify_email: bool) -> Self {
        self.notify_email = notify_email;
        self
    }

    /// Gives the new task to a worker straight away.
    #[must_use]
    pub const fn with_assignee(mut self, worker_id: WorkerId) -> Self {
        self.assignee = Some(worker_id);
        self
    }

    fn into_details(self) -> Result<TaskDetails, TaskDomainError> {
        Ok(TaskDetails {
            title: TaskTitle::new(self.title)?,
            description: self.description,
            category: self.category,
            priority: self.priority,
            due_date: self.due_date,
            due_time: self.due_time,
            recurrence: self.recurrence,
            notify_email: self.notify_email,
        })
    }
}

/// Partial update of descriptive task fields. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<TaskCategory>,
    priority: Option<TaskPriority>,
    due_date: Option<Option<NaiveDate>>,
    due_time: Option<Option<NaiveTime>>,
    recurrence: Option<Recurrence>,
    notify_email: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the due time.
    #[must_use]
    pub const fn with_due_time(mut self, due_time: Option<NaiveTime>) -> Self {
        self.due_time = Some(due_time);
        self
    }

    /// Replaces the repeat schedule.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Turns reminder emails on or off.
    #[must_use]
    pub const fn with_notify_email(mut self, notify_email: bool) -> Self {
        self.notify_email = Some(notify_email);
        self
    }

    fn apply_to(self, current: &TaskDetails) -> Result<TaskDetails, TaskDomainError> {
        let title = self
            .title
            .map_or_else(|| Ok(current.title.clone()), TaskTitle::new)?;
        Ok(TaskDetails {
            title,
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            category: self.category.unwrap_or(current.category),
            priority: self.priority.unwrap_or(current.priority),
            due_date: self.due_date.unwrap_or(current.due_date),
            due_time: self.due_time.unwrap_or(current.due_time),
            recurrence: self.recurrence.unwrap_or(current.recurrence),
            notify_email: self.notify_email.unwrap_or(current.notify_email),
        })
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a state-machine rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Worker lookup failed.
    #[error(transparent)]
    Worker(#[from] WorkerRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The worker does not exist.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),
    /// The worker has been deactivated and cannot take new tasks.
    #[error("worker {0} is inactive")]
    WorkerInactive(WorkerId),
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Worker(err) => err.kind(),
            Self::TaskNotFound(_) | Self::WorkerNotFound(_) => ErrorKind::NotFound,
            Self::WorkerInactive(_) => ErrorKind::Conflict,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<R, W, C>
where
    R: TaskRepository,
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    workers: Arc<W>,
    clock: Arc<C>,
    changes: broadcast::Sender<TaskChange>,
}

impl<R, W, C> Clone for TaskLifecycleService<R, W, C>
where
    R: TaskRepository,
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            workers: Arc::clone(&self.workers),
            clock: Arc::clone(&self.clock),
            changes: self.changes.clone(),
        }
    }
}

impl<R, W, C> TaskLifecycleService<R, W, C>
where
    R: TaskRepository,
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(tasks: Arc<R>, workers: Arc<W>, clock: Arc<C>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            tasks,
            workers,
            clock,
            changes,
        }
    }

    /// Subscribes to task change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskChange> {
        self.changes.subscribe()
    }

    /// Creates a not-started task, optionally assigned to an active worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank title,
    /// [`TaskLifecycleError::WorkerNotFound`] or
    /// [`TaskLifecycleError::WorkerInactive`] for an unusable assignee, or
    /// [`TaskLifecycleError::Repository`] when the store rejects the task.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let assignee = request.assignee;
        let outcome = self.create_task(request).await;
        match &outcome {
            Ok(task) => {
                info!(task_id = %task.id(), title = %task.details().title, "created task");
                self.publish(task.id(), assignee.into_iter().collect(), Some(task.state()));
            }
            Err(err) => warn!(error = %err, kind = %err.kind(), "task creation failed"),
        }
        outcome
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.load(task_id).await
    }

    /// Gives a task to an active worker.
    ///
    /// Assigning to the current owner changes nothing. An assignment held
    /// by a deactivated worker is released first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the task is completed or
    /// owned by another active worker, and
    /// [`TaskLifecycleError::WorkerNotFound`] or
    /// [`TaskLifecycleError::WorkerInactive`] for an unusable target.
    pub async fn assign(&self, task_id: TaskId, worker_id: WorkerId) -> TaskLifecycleResult<Task> {
        self.assign_task(task_id, worker_id).await.inspect_err(|err| {
            warn!(%task_id, %worker_id, error = %err, kind = %err.kind(), "task assignment failed");
        })
    }

    /// Clears the owner, leaving progress untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for completed tasks.
    pub async fn unassign(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Unassign.as_str(), |task, clock| {
            task.unassign(clock)
        })
        .await
    }

    /// Starts work on a task. Starting an in-progress task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for blocked or completed
    /// tasks.
    pub async fn start(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Start.as_str(), |task, clock| {
            task.start(clock)
        })
        .await
    }

    /// Undoes a start.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] unless the task is in
    /// progress.
    pub async fn revert(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Revert.as_str(), |task, clock| {
            task.revert(clock).map(Some)
        })
        .await
    }

    /// Blocks a task with a reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank reason or a
    /// completed task.
    pub async fn block(&self, task_id: TaskId, reason: &str) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Block.as_str(), |task, clock| {
            task.block(reason, clock).map(Some)
        })
        .await
    }

    /// Clears a block; the task returns to not-started.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] unless the task is blocked.
    pub async fn unblock(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Unblock.as_str(), |task, clock| {
            task.unblock(clock).map(Some)
        })
        .await
    }

    /// Completes a task with an optional note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for blocked or completed
    /// tasks.
    pub async fn complete(&self, task_id: TaskId, note: Option<&str>) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Complete.as_str(), |task, clock| {
            task.complete(note, clock).map(Some)
        })
        .await
    }

    /// Reopens a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] unless the task is completed.
    pub async fn uncomplete(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Uncomplete.as_str(), |task, clock| {
            task.uncomplete(clock).map(Some)
        })
        .await
    }

    /// Sets or clears the worker note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing or the store
    /// fails.
    pub async fn set_worker_note(
        &self,
        task_id: TaskId,
        note: Option<&str>,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, "worker_note", |task, clock| {
            Ok(Some(task.set_worker_note(note, clock)))
        })
        .await
    }

    /// Edits descriptive fields without touching lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank replacement title.
    pub async fn update(
        &self,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, "edit", |task, clock| {
            let details = request.apply_to(task.details())?;
            Ok(Some(task.edit(details, clock)))
        })
        .await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        let outcome = self.delete_task(task_id).await;
        match &outcome {
            Ok(owner) => {
                info!(%task_id, "deleted task");
                self.publish(task_id, owner.iter().copied().collect(), None);
            }
            Err(err) => warn!(%task_id, error = %err, kind = %err.kind(), "task deletion failed"),
        }
        outcome.map(|_| ())
    }

    /// Lists every task in store order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_all(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_all().await?)
    }

    /// Lists a worker's tasks, open ones first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::WorkerNotFound`] for unknown workers.
    pub async fn list_for_worker(
        &self,
        worker_id: WorkerId,
        include_completed: bool,
    ) -> TaskLifecycleResult<Vec<Task>> {
        if self.workers.find_by_id(worker_id).await?.is_none() {
            return Err(TaskLifecycleError::WorkerNotFound(worker_id));
        }
        Ok(self
            .tasks
            .list_for_worker(worker_id, include_completed)
            .await?)
    }

    /// Lists open tasks nobody owns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_assignable(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_assignable().await?)
    }

    /// Lists tasks due today.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_today(&self) -> TaskLifecycleResult<Vec<Task>> {
        self.list_due(DueWindow::Today).await
    }

    /// Lists open tasks due in the coming week.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_upcoming(&self) -> TaskLifecycleResult<Vec<Task>> {
        self.list_due(DueWindow::Upcoming).await
    }

    /// Lists open tasks whose due date has passed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_overdue(&self) -> TaskLifecycleResult<Vec<Task>> {
        self.list_due(DueWindow::Overdue).await
    }

    async fn list_due(&self, window: DueWindow) -> TaskLifecycleResult<Vec<Task>> {
        let today = self.clock.utc().date_naive();
        debug!(window = window.as_str(), %today, "listing tasks by due date");
        Ok(self.tasks.list_due(window, today).await?)
    }

    async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let assignee = request.assignee;
        let details = request.into_details()?;
        if let Some(worker_id) = assignee {
            self.require_active_worker(worker_id).await?;
        }
        let task = Task::new(details, assignee, &*self.clock);
        Ok(self.tasks.store(&task).await?)
    }

    async fn assign_task(&self, task_id: TaskId, worker_id: WorkerId) -> TaskLifecycleResult<Task> {
        self.require_active_worker(worker_id).await?;
        let mut task = self.load(task_id).await?;
        let displaced = match task.assignee() {
            Some(owner) if owner != worker_id && !self.is_active_worker(owner).await? => Some(owner),
            _ => None,
        };

        let outcome = if displaced.is_some() {
            task.reassign(worker_id, &*self.clock)?
        } else {
            task.assign(worker_id, &*self.clock)?
        };
        let Some(transition) = outcome else {
            return Ok(task);
        };
        let stored = self.tasks.record(&task, &transition).await?;
        if let Some(owner) = displaced {
            info!(%task_id, worker_id = %owner, "released task held by inactive worker");
        }
        info!(%task_id, %worker_id, "assigned task");
        let affected = displaced.into_iter().chain([worker_id]).collect();
        self.publish(task_id, affected, Some(stored.state()));
        Ok(stored)
    }

    async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<WorkerId>> {
        let task = self.load(task_id).await?;
        self.tasks.delete(task_id).await?;
        Ok(task.assignee())
    }

    async fn transition<F>(
        &self,
        task_id: TaskId,
        operation: &'static str,
        apply: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<Option<TaskTransition>, TaskDomainError> + Send,
    {
        let outcome = self.apply_transition(task_id, apply).await;
        match &outcome {
            Ok(task) => debug!(%task_id, operation, state = %task.state(), "task transition applied"),
            Err(err) => warn!(
                %task_id,
                operation,
                error = %err,
                kind = %err.kind(),
                "task transition failed"
            ),
        }
        outcome
    }

    async fn apply_transition<F>(&self, task_id: TaskId, apply: F) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<Option<TaskTransition>, TaskDomainError> + Send,
    {
        let mut task = self.load(task_id).await?;
        let previous_owner = task.assignee();
        let Some(transition) = apply(&mut task, &*self.clock)? else {
            return Ok(task);
        };
        let stored = self.tasks.record(&task, &transition).await?;
        let affected = previous_owner.into_iter().chain(stored.assignee()).collect();
        self.publish(task_id, affected, Some(stored.state()));
        Ok(stored)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn require_active_worker(&self, worker_id: WorkerId) -> TaskLifecycleResult<()> {
        let worker = self
            .workers
            .find_by_id(worker_id)
            .await?
            .ok_or(TaskLifecycleError::WorkerNotFound(worker_id))?;
        if !worker.is_active() {
            return Err(TaskLifecycleError::WorkerInactive(worker_id));
        }
        Ok(())
    }

    async fn is_active_worker(&self, worker_id: WorkerId) -> TaskLifecycleResult<bool> {
        let worker = self.workers.find_by_id(worker_id).await?;
        Ok(worker.is_some_and(|found| found.is_active()))
    }

    fn publish(&self, task_id: TaskId, mut worker_ids: Vec<WorkerId>, state: Option<TaskState>) {
        worker_ids.sort_unstable();
        worker_ids.dedup();
        let change = TaskChange {
            task_id,
            worker_ids,
            state,
        };
        if self.changes.send(change).is_err() {
            trace!(%task_id, "no task change subscribers");
        }
    }
}
