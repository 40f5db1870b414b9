//! Error types for dev item and feedback validation and transitions.

use super::{DevAction, DevItemId, DevStatus, FeedbackId, FeedbackStatus, ReviewAction};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by dev item and feedback domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DevDomainError {
    /// The title is empty after trimming.
    #[error("dev item title must not be empty")]
    EmptyTitle,

    /// A failed test was recorded without a comment.
    #[error("a comment is required to fail a dev item")]
    EmptyFailNote,

    /// A decline or kickback was submitted without a note.
    #[error("a note is required to {0} feedback")]
    EmptyReviewNote(ReviewAction),

    /// New items start in pending or backlog only.
    #[error("dev items cannot be created as {0}")]
    InvalidInitialStatus(DevStatus),

    /// The action is not permitted from the item's current status.
    #[error("cannot {action} dev item {item_id} while it is {status}")]
    InvalidTransition {
        /// Item identifier.
        item_id: DevItemId,
        /// Status at the time of the attempt.
        status: DevStatus,
        /// Refused action.
        action: DevAction,
    },

    /// The feedback has already been approved or declined.
    #[error("feedback {feedback_id} is already {status}")]
    FeedbackNotPending {
        /// Feedback identifier.
        feedback_id: FeedbackId,
        /// Status at the time of the attempt.
        status: FeedbackStatus,
    },
}

impl DevDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle
            | Self::EmptyFailNote
            | Self::EmptyReviewNote(_)
            | Self::InvalidInitialStatus(_) => ErrorKind::Validation,
            Self::InvalidTransition { .. } | Self::FeedbackNotPending { .. } => {
                ErrorKind::Conflict
            }
        }
    }
}

/// Error returned while parsing an enumerated dev tracker field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dev tracker {field}: {value}")]
pub struct ParseDevValueError {
    /// Field being parsed.
    pub field: &'static str,
    /// Rejected input.
    pub value: String,
}
