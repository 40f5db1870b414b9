//! Task progress, the derived lifecycle state, and lifecycle actions.

use super::ParseTaskValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a task is in its lifecycle.
///
/// Exactly one variant holds at a time, so "completed and blocked" cannot
/// be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskProgress {
    /// Work has not started.
    #[default]
    NotStarted,
    /// Someone is working on the task.
    InProgress,
    /// Work cannot continue.
    Blocked {
        /// Why the task is blocked.
        reason: String,
    },
    /// The task is done.
    Completed {
        /// Optional note left on completion.
        note: Option<String>,
    },
}

impl TaskProgress {
    /// Reports whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Reports whether the task is blocked.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Reports whether the task is in progress.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Observable lifecycle state, combining progress with assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Not started and owned by nobody.
    Unassigned,
    /// Not started and owned by a worker.
    Assigned,
    /// Being worked on.
    InProgress,
    /// Waiting on something.
    Blocked,
    /// Done.
    Completed,
}

impl TaskState {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unassigned" => Ok(Self::Unassigned),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskValueError::new("state", value)),
        }
    }
}

/// Lifecycle action a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Give the task to a worker.
    Assign,
    /// Take the task away from its worker.
    Unassign,
    /// Begin work.
    Start,
    /// Undo a start.
    Revert,
    /// Mark as blocked with a reason.
    Block,
    /// Clear a block.
    Unblock,
    /// Mark as done.
    Complete,
    /// Undo a completion.
    Uncomplete,
}

impl TaskAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Start => "start",
            Self::Revert => "revert",
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Complete => "complete",
            Self::Uncomplete => "uncomplete",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
