//! REST adapter for the task repository port.
//!
//! The backend still speaks the legacy flag triple (`is_completed`,
//! `is_in_progress`, `is_blocked`). [`TaskDto`] converts between the flags
//! and [`TaskProgress`], refusing combinations that break the
//! one-state-at-a-time rule. Transitions are routed to the worker-scoped
//! endpoints when the task has an owner.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};
use crate::task::{
    domain::{
        DueWindow, PersistedTaskData, Recurrence, Task, TaskCategory, TaskDetails,
        TaskDomainError, TaskId, TaskPriority, TaskProgress, TaskTitle, TaskTransition,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::worker::domain::WorkerId;

/// Errors raised while decoding a backend task record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDecodeError {
    /// More than one lifecycle flag is set.
    #[error("task {0} has inconsistent lifecycle flags")]
    InconsistentFlags(TaskId),

    /// The task is flagged blocked without a reason.
    #[error("blocked task {0} carries no reason")]
    MissingBlockReason(TaskId),

    /// A field failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Wire shape of a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    /// Task identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category.
    #[serde(default)]
    pub category: TaskCategory,
    /// Priority, 1 (high) to 3 (low).
    #[serde(default)]
    pub priority: TaskPriority,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Due time.
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
    /// Repeat schedule.
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Reminder email flag.
    #[serde(default)]
    pub notify_email: bool,
    /// Owning worker.
    #[serde(default)]
    pub worker_id: Option<Uuid>,
    /// Completed flag.
    #[serde(default)]
    pub is_completed: bool,
    /// In-progress flag.
    #[serde(default)]
    pub is_in_progress: bool,
    /// Blocked flag.
    #[serde(default)]
    pub is_blocked: bool,
    /// Block reason, present iff blocked.
    #[serde(default)]
    pub blocked_reason: Option<String>,
    /// Completion note.
    #[serde(default)]
    pub completion_note: Option<String>,
    /// Worker note.
    #[serde(default)]
    pub worker_note: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        let details = task.details();
        let progress = task.progress();
        Self {
            id: task.id().into_inner(),
            title: details.title.as_str().to_owned(),
            description: details.description.clone(),
            category: details.category,
            priority: details.priority,
            due_date: details.due_date,
            due_time: details.due_time,
            recurrence: details.recurrence,
            notify_email: details.notify_email,
            worker_id: task.assignee().map(WorkerId::into_inner),
            is_completed: progress.is_completed(),
            is_in_progress: progress.is_in_progress(),
            is_blocked: progress.is_blocked(),
            blocked_reason: task.blocked_reason().map(str::to_owned),
            completion_note: task.completion_note().map(str::to_owned),
            worker_note: task.worker_note().map(str::to_owned),
            created_at: task.created_at(),
            updated_at: Some(task.updated_at()),
        }
    }
}

impl TryFrom<TaskDto> for Task {
    type Error = TaskDecodeError;

    fn try_from(dto: TaskDto) -> Result<Self, Self::Error> {
        let id = TaskId::from_uuid(dto.id);
        let progress = match (dto.is_completed, dto.is_blocked, dto.is_in_progress) {
            (false, false, false) => TaskProgress::NotStarted,
            (false, false, true) => TaskProgress::InProgress,
            (false, true, false) => {
                let reason = dto
                    .blocked_reason
                    .filter(|reason| !reason.trim().is_empty())
                    .ok_or(TaskDecodeError::MissingBlockReason(id))?;
                TaskProgress::Blocked { reason }
            }
            (true, false, false) => TaskProgress::Completed {
                note: dto.completion_note,
            },
            _ => return Err(TaskDecodeError::InconsistentFlags(id)),
        };

        let details = TaskDetails {
            title: TaskTitle::new(dto.title)?,
            description: dto.description,
            category: dto.category,
            priority: dto.priority,
            due_date: dto.due_date,
            due_time: dto.due_time,
            recurrence: dto.recurrence,
            notify_email: dto.notify_email,
        };

        Ok(Self::from_persisted(PersistedTaskData {
            id,
            details,
            assignee: dto.worker_id.map(WorkerId::from_uuid),
            progress,
            worker_note: dto.worker_note,
            created_at: dto.created_at,
            updated_at: dto.updated_at.unwrap_or(dto.created_at),
        }))
    }
}

/// REST call that records one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRoute {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the backend base URL.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl TaskRoute {
    const fn new(method: Method, path: String, body: Option<Value>) -> Self {
        Self { method, path, body }
    }
}

/// Chooses the endpoint that records `transition` for `task`.
///
/// `task` is the state after the transition was applied. For
/// [`TaskTransition::Reassign`] this is only the final assignment call; see
/// [`routes`].
#[must_use]
pub fn route(task: &Task, transition: &TaskTransition) -> TaskRoute {
    let task_id = task.id();
    let worker_path =
        |worker_id: WorkerId, verb: &str| format!("/workers/{worker_id}/tasks/{task_id}/{verb}");
    let owned = |verb: &str| task.assignee().map(|worker_id| worker_path(worker_id, verb));
    let flags_patch = || {
        TaskRoute::new(
            Method::PATCH,
            format!("/tasks/{task_id}"),
            Some(json!({
                "is_in_progress": task.progress().is_in_progress(),
                "is_blocked": task.progress().is_blocked(),
                "blocked_reason": task.blocked_reason(),
            })),
        )
    };

    match transition {
        TaskTransition::Assign { worker_id } | TaskTransition::Reassign { to: worker_id, .. } => {
            TaskRoute::new(Method::POST, worker_path(*worker_id, "assignment"), None)
        }
        TaskTransition::Unassign { worker_id } => {
            TaskRoute::new(Method::DELETE, worker_path(*worker_id, "assignment"), None)
        }
        TaskTransition::Start => owned("start")
            .map_or_else(flags_patch, |path| TaskRoute::new(Method::POST, path, None)),
        TaskTransition::Revert => owned("stop")
            .map_or_else(flags_patch, |path| TaskRoute::new(Method::POST, path, None)),
        TaskTransition::Unblock => owned("unblock")
            .map_or_else(flags_patch, |path| TaskRoute::new(Method::POST, path, None)),
        TaskTransition::Block { reason } => owned("block").map_or_else(flags_patch, |path| {
            TaskRoute::new(Method::POST, path, Some(json!({ "reason": reason })))
        }),
        TaskTransition::Complete { note } => {
            let path = owned("complete").unwrap_or_else(|| format!("/tasks/{task_id}/complete"));
            TaskRoute::new(Method::POST, path, Some(json!({ "note": note })))
        }
        TaskTransition::Uncomplete => {
            TaskRoute::new(Method::POST, format!("/tasks/{task_id}/uncomplete"), None)
        }
        TaskTransition::WorkerNote { note } => owned("note").map_or_else(
            || {
                TaskRoute::new(
                    Method::PATCH,
                    format!("/tasks/{task_id}"),
                    Some(json!({ "worker_note": note })),
                )
            },
            |path| TaskRoute::new(Method::PATCH, path, Some(json!({ "note": note }))),
        ),
        TaskTransition::Edit => {
            let details = task.details();
            TaskRoute::new(
                Method::PATCH,
                format!("/tasks/{task_id}"),
                Some(json!({
                    "title": details.title.as_str(),
                    "description": details.description,
                    "category": details.category,
                    "priority": details.priority,
                    "due_date": details.due_date,
                    "due_time": details.due_time,
                    "recurrence": details.recurrence,
                    "notify_email": details.notify_email,
                })),
            )
        }
    }
}

/// Lists the calls that record `transition` for `task`, in order.
///
/// The backend has no single reassignment endpoint, so a reassignment
/// releases the previous owner before assigning the new one.
#[must_use]
pub fn routes(task: &Task, transition: &TaskTransition) -> Vec<TaskRoute> {
    match transition {
        TaskTransition::Reassign { from, .. } => vec![
            route(task, &TaskTransition::Unassign { worker_id: *from }),
            route(task, transition),
        ],
        other => vec![route(task, other)],
    }
}

/// Task repository backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpTaskRepository {
    client: BackendClient,
}

impl HttpTaskRepository {
    /// Creates a repository using `client`.
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn restore_owner(&self, task: &Task, owner: WorkerId) {
        let restore = route(task, &TaskTransition::Assign { worker_id: owner });
        let restored = self
            .client
            .send(restore.method, &restore.path, restore.body.as_ref())
            .await;
        if let Err(err) = restored {
            warn!(
                task_id = %task.id(),
                worker_id = %owner,
                error = %err,
                "could not restore released task owner"
            );
        }
    }

    async fn fetch(&self, path: &str, query: &[(&str, String)]) -> TaskRepositoryResult<Vec<Task>> {
        let dtos: Vec<TaskDto> = self
            .client
            .get_json(path, query)
            .await
            .map_err(TaskRepositoryError::unavailable)?;
        dtos.into_iter()
            .map(|dto| Task::try_from(dto).map_err(TaskRepositoryError::unavailable))
            .collect()
    }
}

fn map_backend_error(err: BackendError, id: TaskId) -> TaskRepositoryError {
    match err {
        BackendError::NotFound(_) => TaskRepositoryError::NotFound(id),
        BackendError::Conflict(message) => TaskRepositoryError::Conflict(message),
        BackendError::Validation(message) => TaskRepositoryError::Rejected(message),
        other => TaskRepositoryError::unavailable(other),
    }
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let dto: TaskDto = self
            .client
            .send_json(Method::POST, "/tasks", &TaskDto::from(task))
            .await
            .map_err(|err| map_backend_error(err, task.id()))?;
        Task::try_from(dto).map_err(TaskRepositoryError::unavailable)
    }

    async fn record(&self, task: &Task, transition: &TaskTransition) -> TaskRepositoryResult<Task> {
        let mut released = None;
        for TaskRoute { method, path, body } in routes(task, transition) {
            let sent = self.client.send(method, &path, body.as_ref()).await;
            if let Err(err) = sent {
                if let Some(owner) = released {
                    self.restore_owner(task, owner).await;
                }
                return Err(map_backend_error(err, task.id()));
            }
            if let TaskTransition::Reassign { from, .. } = transition {
                released = Some(*from);
            }
        }
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.fetch("/tasks", &[]).await?;
        Ok(tasks.into_iter().find(|task| task.id() == id))
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.fetch("/tasks", &[]).await
    }

    async fn list_for_worker(
        &self,
        worker_id: WorkerId,
        include_completed: bool,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let path = format!("/workers/{worker_id}/tasks");
        self.fetch(&path, &[("include_completed", include_completed.to_string())])
            .await
    }

    async fn list_assignable(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.fetch("/tasks/assignable", &[]).await
    }

    // The backend applies its own notion of today.
    async fn list_due(&self, window: DueWindow, _today: NaiveDate) -> TaskRepositoryResult<Vec<Task>> {
        let path = format!("/tasks/{}", window.as_str());
        self.fetch(&path, &[]).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.client
            .send(Method::DELETE, &format!("/tasks/{id}"), None)
            .await
            .map_err(|err| map_backend_error(err, id))
    }
}
