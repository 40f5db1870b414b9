//! Task aggregate root and its transition functions.

use super::{TaskAction, TaskDetails, TaskDomainError, TaskId, TaskProgress, TaskState};
use crate::worker::domain::WorkerId;
use chrono::{DateTime, Days, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Number of days after today covered by [`DueWindow::Upcoming`].
pub const UPCOMING_DAYS: u64 = 7;

/// Change recorded against a task, as the store needs to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskTransition {
    /// The task was given to a worker.
    Assign {
        /// New owner.
        worker_id: WorkerId,
    },
    /// The task moved straight from one worker to another.
    Reassign {
        /// Previous owner.
        from: WorkerId,
        /// New owner.
        to: WorkerId,
    },
    /// The task was taken away from a worker.
    Unassign {
        /// Previous owner.
        worker_id: WorkerId,
    },
    /// Work began.
    Start,
    /// A start was undone.
    Revert,
    /// The task was blocked.
    Block {
        /// Block reason.
        reason: String,
    },
    /// A block was cleared.
    Unblock,
    /// The task was completed.
    Complete {
        /// Completion note.
        note: Option<String>,
    },
    /// A completion was undone.
    Uncomplete,
    /// The worker note changed.
    WorkerNote {
        /// New note; `None` clears it.
        note: Option<String>,
    },
    /// Descriptive fields changed.
    Edit,
}

/// Due-date window used by the day-planning task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    /// Due today, in any state.
    Today,
    /// Open and due within [`UPCOMING_DAYS`] after today.
    Upcoming,
    /// Open and due before today.
    Overdue,
}

impl DueWindow {
    /// Returns the canonical representation, also used as the REST path
    /// segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::Overdue => "overdue",
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    details: TaskDetails,
    assignee: Option<WorkerId>,
    progress: TaskProgress,
    worker_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted descriptive fields.
    pub details: TaskDetails,
    /// Persisted owner, if any.
    pub assignee: Option<WorkerId>,
    /// Persisted progress.
    pub progress: TaskProgress,
    /// Persisted worker note.
    pub worker_note: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a not-started task, optionally already owned by a worker.
    #[must_use]
    pub fn new(details: TaskDetails, assignee: Option<WorkerId>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            details,
            assignee,
            progress: TaskProgress::NotStarted,
            worker_note: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            details: data.details,
            assignee: data.assignee,
            progress: data.progress,
            worker_note: data.worker_note,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the owning worker, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<WorkerId> {
        self.assignee
    }

    /// Returns the progress.
    #[must_use]
    pub const fn progress(&self) -> &TaskProgress {
        &self.progress
    }

    /// Returns the observable lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        match (&self.progress, self.assignee) {
            (TaskProgress::NotStarted, None) => TaskState::Unassigned,
            (TaskProgress::NotStarted, Some(_)) => TaskState::Assigned,
            (TaskProgress::InProgress, _) => TaskState::InProgress,
            (TaskProgress::Blocked { .. }, _) => TaskState::Blocked,
            (TaskProgress::Completed { .. }, _) => TaskState::Completed,
        }
    }

    /// Returns the block reason while blocked.
    #[must_use]
    pub fn blocked_reason(&self) -> Option<&str> {
        match &self.progress {
            TaskProgress::Blocked { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the completion note while completed.
    #[must_use]
    pub fn completion_note(&self) -> Option<&str> {
        match &self.progress {
            TaskProgress::Completed { note } => note.as_deref(),
            _ => None,
        }
    }

    /// Returns the free-text worker note.
    #[must_use]
    pub fn worker_note(&self) -> Option<&str> {
        self.worker_note.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports whether the task falls in `window` relative to `today`.
    #[must_use]
    pub fn is_in_window(&self, window: DueWindow, today: NaiveDate) -> bool {
        let Some(due) = self.details.due_date else {
            return false;
        };
        let open = !self.progress.is_completed();
        match window {
            DueWindow::Today => due == today,
            DueWindow::Overdue => open && due < today,
            DueWindow::Upcoming => {
                let horizon = today
                    .checked_add_days(Days::new(UPCOMING_DAYS))
                    .unwrap_or(NaiveDate::MAX);
                open && due > today && due <= horizon
            }
        }
    }

    /// Gives the task to `worker_id`.
    ///
    /// Returns `Ok(None)` when the worker already owns the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for completed tasks and
    /// [`TaskDomainError::AlreadyAssigned`] when another worker owns it.
    pub fn assign(
        &mut self,
        worker_id: WorkerId,
        clock: &impl Clock,
    ) -> Result<Option<TaskTransition>, TaskDomainError> {
        self.ensure_open(TaskAction::Assign)?;
        match self.assignee {
            Some(current) if current == worker_id => Ok(None),
            Some(current) => Err(TaskDomainError::AlreadyAssigned {
                task_id: self.id,
                worker_id: current,
            }),
            None => {
                self.assignee = Some(worker_id);
                self.touch(clock);
                Ok(Some(TaskTransition::Assign { worker_id }))
            }
        }
    }

    /// Hands the task to `worker_id`, displacing any current owner.
    ///
    /// Progress is kept. Behaves like [`Task::assign`] when nobody owns the
    /// task or `worker_id` already does.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for completed tasks.
    pub fn reassign(
        &mut self,
        worker_id: WorkerId,
        clock: &impl Clock,
    ) -> Result<Option<TaskTransition>, TaskDomainError> {
        match self.assignee {
            Some(from) if from != worker_id => {
                self.ensure_open(TaskAction::Assign)?;
                self.assignee = Some(worker_id);
                self.touch(clock);
                Ok(Some(TaskTransition::Reassign {
                    from,
                    to: worker_id,
                }))
            }
            _ => self.assign(worker_id, clock),
        }
    }

    /// Clears the owner without touching progress.
    ///
    /// Returns `Ok(None)` when nobody owns the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for completed tasks.
    pub fn unassign(
        &mut self,
        clock: &impl Clock,
    ) -> Result<Option<TaskTransition>, TaskDomainError> {
        self.ensure_open(TaskAction::Unassign)?;
        let Some(worker_id) = self.assignee.take() else {
            return Ok(None);
        };
        self.touch(clock);
        Ok(Some(TaskTransition::Unassign { worker_id }))
    }

    /// Moves a not-started task into progress.
    ///
    /// Returns `Ok(None)` when the task is already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for blocked or
    /// completed tasks.
    pub fn start(&mut self, clock: &impl Clock) -> Result<Option<TaskTransition>, TaskDomainError> {
        match self.progress {
            TaskProgress::InProgress => Ok(None),
            TaskProgress::NotStarted => {
                self.progress = TaskProgress::InProgress;
                self.touch(clock);
                Ok(Some(TaskTransition::Start))
            }
            TaskProgress::Blocked { .. } | TaskProgress::Completed { .. } => {
                Err(self.refuse(TaskAction::Start))
            }
        }
    }

    /// Undoes a start.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is in
    /// progress.
    pub fn revert(&mut self, clock: &impl Clock) -> Result<TaskTransition, TaskDomainError> {
        if !self.progress.is_in_progress() {
            return Err(self.refuse(TaskAction::Revert));
        }
        self.progress = TaskProgress::NotStarted;
        self.touch(clock);
        Ok(TaskTransition::Revert)
    }

    /// Blocks the task, replacing any earlier reason.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBlockReason`] for a blank reason and
    /// [`TaskDomainError::InvalidTransition`] for completed tasks.
    pub fn block(&mut self, reason: &str, clock: &impl Clock) -> Result<TaskTransition, TaskDomainError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyBlockReason);
        }
        self.ensure_open(TaskAction::Block)?;
        self.progress = TaskProgress::Blocked {
            reason: trimmed.to_owned(),
        };
        self.touch(clock);
        Ok(TaskTransition::Block {
            reason: trimmed.to_owned(),
        })
    }

    /// Clears a block. The task returns to not-started, not to in-progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// blocked.
    pub fn unblock(&mut self, clock: &impl Clock) -> Result<TaskTransition, TaskDomainError> {
        if !self.progress.is_blocked() {
            return Err(self.refuse(TaskAction::Unblock));
        }
        self.progress = TaskProgress::NotStarted;
        self.touch(clock);
        Ok(TaskTransition::Unblock)
    }

    /// Completes a not-started or in-progress task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] for blocked or already
    /// completed tasks.
    pub fn complete(
        &mut self,
        note: Option<&str>,
        clock: &impl Clock,
    ) -> Result<TaskTransition, TaskDomainError> {
        match self.progress {
            TaskProgress::NotStarted | TaskProgress::InProgress => {
                let note = normalize_note(note);
                self.progress = TaskProgress::Completed { note: note.clone() };
                self.touch(clock);
                Ok(TaskTransition::Complete { note })
            }
            TaskProgress::Blocked { .. } | TaskProgress::Completed { .. } => {
                Err(self.refuse(TaskAction::Complete))
            }
        }
    }

    /// Undoes a completion and drops the completion note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// completed.
    pub fn uncomplete(&mut self, clock: &impl Clock) -> Result<TaskTransition, TaskDomainError> {
        if !self.progress.is_completed() {
            return Err(self.refuse(TaskAction::Uncomplete));
        }
        self.progress = TaskProgress::NotStarted;
        self.touch(clock);
        Ok(TaskTransition::Uncomplete)
    }

    /// Sets or clears the worker note. Allowed in every state.
    pub fn set_worker_note(&mut self, note: Option<&str>, clock: &impl Clock) -> TaskTransition {
        self.worker_note = normalize_note(note);
        self.touch(clock);
        TaskTransition::WorkerNote {
            note: self.worker_note.clone(),
        }
    }

    /// Replaces descriptive fields. Allowed in every state.
    pub fn edit(&mut self, details: TaskDetails, clock: &impl Clock) -> TaskTransition {
        self.details = details;
        self.touch(clock);
        TaskTransition::Edit
    }

    fn ensure_open(&self, action: TaskAction) -> Result<(), TaskDomainError> {
        if self.progress.is_completed() {
            return Err(self.refuse(action));
        }
        Ok(())
    }

    const fn refuse(&self, action: TaskAction) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            state: self.state(),
            action,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
