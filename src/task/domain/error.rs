//! Error types for task domain validation and transitions.

use super::{TaskAction, TaskId, TaskState};
use crate::error::ErrorKind;
use crate::worker::domain::WorkerId;
use thiserror::Error;

/// Errors returned by task construction and transition functions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A block was requested without a reason.
    #[error("a reason is required to block a task")]
    EmptyBlockReason,

    /// The action is not permitted from the task's current state.
    #[error("cannot {action} task {task_id} while it is {state}")]
    InvalidTransition {
        /// Task identifier.
        task_id: TaskId,
        /// State at the time of the attempt.
        state: TaskState,
        /// Refused action.
        action: TaskAction,
    },

    /// Another worker already owns the task.
    #[error("task {task_id} is already assigned to worker {worker_id}")]
    AlreadyAssigned {
        /// Task identifier.
        task_id: TaskId,
        /// Current owner.
        worker_id: WorkerId,
    },
}

impl TaskDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle | Self::EmptyBlockReason => ErrorKind::Validation,
            Self::InvalidTransition { .. } | Self::AlreadyAssigned { .. } => ErrorKind::Conflict,
        }
    }
}

/// Error returned while parsing an enumerated task field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {field}: {value}")]
pub struct ParseTaskValueError {
    /// Field being parsed.
    pub field: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseTaskValueError {
    pub(crate) fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}
