//! Repository port for dev item persistence.

use super::DevStoreResult;
use crate::dev_tracker::domain::{DevItem, DevItemId, DevMetrics};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Dev item persistence contract.
#[async_trait]
pub trait DevItemRepository: Send + Sync {
    /// Stores a new item and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::DuplicateItem`](super::DevStoreError::DuplicateItem)
    /// when the identifier already exists.
    async fn store(&self, item: &DevItem) -> DevStoreResult<DevItem>;

    /// Persists changes to an existing item.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::ItemNotFound`](super::DevStoreError::ItemNotFound)
    /// when the item does not exist.
    async fn update(&self, item: &DevItem) -> DevStoreResult<DevItem>;

    /// Finds an item by identifier.
    async fn find_by_id(&self, id: DevItemId) -> DevStoreResult<Option<DevItem>>;

    /// Lists every item in store order.
    async fn list_all(&self) -> DevStoreResult<Vec<DevItem>>;

    /// Deletes an item in any status.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::ItemNotFound`](super::DevStoreError::ItemNotFound)
    /// when the item does not exist.
    async fn delete(&self, id: DevItemId) -> DevStoreResult<()>;

    /// Returns dashboard counters as of `now`.
    async fn metrics(&self, now: DateTime<Utc>) -> DevStoreResult<DevMetrics>;
}
