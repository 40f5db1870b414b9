//! Error types for supply request validation and transitions.

use super::{SupplyAction, SupplyRequestId, SupplyStatus};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by supply request construction and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SupplyDomainError {
    /// The item name is empty after trimming.
    #[error("item name must not be empty")]
    EmptyItemName,

    /// The action does not start from the request's current status.
    #[error("cannot {action} supply request {request_id} while it is {status}")]
    InvalidTransition {
        /// Request identifier.
        request_id: SupplyRequestId,
        /// Status at the time of the attempt.
        status: SupplyStatus,
        /// Refused action.
        action: SupplyAction,
    },
}

impl SupplyDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyItemName => ErrorKind::Validation,
            Self::InvalidTransition { .. } => ErrorKind::Conflict,
        }
    }
}
