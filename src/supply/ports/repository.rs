//! Repository port for supply request persistence.

use crate::error::ErrorKind;
use crate::supply::domain::{SupplyRequest, SupplyRequestFilter, SupplyRequestId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for supply repository operations.
pub type SupplyRepositoryResult<T> = Result<T, SupplyRepositoryError>;

/// Supply request persistence contract.
#[async_trait]
pub trait SupplyRepository: Send + Sync {
    /// Stores a new request and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRepositoryError::DuplicateRequest`] when the
    /// identifier already exists.
    async fn store(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest>;

    /// Persists changes to an existing request.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRepositoryError::NotFound`] when the request does not
    /// exist.
    async fn update(&self, request: &SupplyRequest) -> SupplyRepositoryResult<SupplyRequest>;

    /// Finds a request by identifier.
    async fn find_by_id(&self, id: SupplyRequestId)
    -> SupplyRepositoryResult<Option<SupplyRequest>>;

    /// Lists requests selected by `filter`.
    async fn list(&self, filter: SupplyRequestFilter) -> SupplyRepositoryResult<Vec<SupplyRequest>>;

    /// Deletes a request.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRepositoryError::NotFound`] when the request does not
    /// exist.
    async fn delete(&self, id: SupplyRequestId) -> SupplyRepositoryResult<()>;
}

/// Errors returned by supply repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SupplyRepositoryError {
    /// A request with the same identifier already exists.
    #[error("duplicate supply request identifier: {0}")]
    DuplicateRequest(SupplyRequestId),

    /// The request was not found.
    #[error("supply request not found: {0}")]
    NotFound(SupplyRequestId),

    /// The store refused the change because of conflicting state.
    #[error("supply store reported a conflict: {0}")]
    Conflict(String),

    /// The store refused the payload.
    #[error("supply store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or failed.
    #[error("supply store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl SupplyRepositoryError {
    /// Wraps an infrastructure error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateRequest(_) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected(_) => ErrorKind::Validation,
            Self::Unavailable(_) => ErrorKind::Network,
        }
    }
}
