//! Errors shared by the dev tracker store ports.

use crate::dev_tracker::domain::{DevItemId, FeedbackId, ImageId};
use crate::error::ErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dev tracker store operations.
pub type DevStoreResult<T> = Result<T, DevStoreError>;

/// Errors returned by dev item, image and feedback store implementations.
#[derive(Debug, Clone, Error)]
pub enum DevStoreError {
    /// An item with the same identifier already exists.
    #[error("duplicate dev item identifier: {0}")]
    DuplicateItem(DevItemId),

    /// The dev item was not found.
    #[error("dev item not found: {0}")]
    ItemNotFound(DevItemId),

    /// The image is not attached to the item.
    #[error("image {image_id} not found on dev item {item_id}")]
    ImageNotFound {
        /// Owning item.
        item_id: DevItemId,
        /// Missing image.
        image_id: ImageId,
    },

    /// The feedback item was not found.
    #[error("feedback not found: {0}")]
    FeedbackNotFound(FeedbackId),

    /// The store refused the change because of conflicting state.
    #[error("dev tracker store reported a conflict: {0}")]
    Conflict(String),

    /// The store refused the payload.
    #[error("dev tracker store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or failed.
    #[error("dev tracker store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl DevStoreError {
    /// Wraps an infrastructure error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateItem(_) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::ItemNotFound(_) | Self::ImageNotFound { .. } | Self::FeedbackNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Rejected(_) => ErrorKind::Validation,
            Self::Unavailable(_) => ErrorKind::Network,
        }
    }
}
