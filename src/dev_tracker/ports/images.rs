//! Image storage port for dev item attachments.

use super::DevStoreResult;
use crate::dev_tracker::domain::{DevImage, DevItemId, ImageId};
use async_trait::async_trait;

/// File selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name.
    pub filename: String,
    /// MIME type, for example `image/png`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Attachment storage contract. Failed uploads are never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads an image and attaches it to `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::ItemNotFound`](super::DevStoreError::ItemNotFound)
    /// for unknown items or another store error when the upload fails.
    async fn upload(&self, item_id: DevItemId, upload: &ImageUpload) -> DevStoreResult<DevImage>;

    /// Detaches and deletes an image.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::ImageNotFound`](super::DevStoreError::ImageNotFound)
    /// when the image is not attached to the item.
    async fn remove(&self, item_id: DevItemId, image_id: ImageId) -> DevStoreResult<()>;
}
