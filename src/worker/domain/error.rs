//! Error types for worker domain validation.

use thiserror::Error;

/// Errors returned while constructing worker domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerDomainError {
    /// The worker name is empty after trimming.
    #[error("worker name must not be empty")]
    EmptyName,
}
