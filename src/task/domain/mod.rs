//! Domain model for task lifecycle management.
//!
//! Transition functions live on [`Task`]; each returns the
//! [`TaskTransition`] the store must record, or an error naming the action
//! and the state that refused it.

mod details;
mod error;
mod ids;
mod progress;
mod task;

pub use details::{Recurrence, TaskCategory, TaskDetails, TaskPriority, TaskTitle};
pub use error::{ParseTaskValueError, TaskDomainError};
pub use ids::TaskId;
pub use progress::{TaskAction, TaskProgress, TaskState};
pub use task::{DueWindow, PersistedTaskData, Task, TaskTransition};
