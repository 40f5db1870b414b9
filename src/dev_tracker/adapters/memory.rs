//! In-memory dev tracker store.
//!
//! One shared state backs the item repository, the image store and the
//! feedback gateway, so approving feedback adds the new item to the same
//! list the repository serves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::dev_tracker::{
    domain::{
        DevDomainError, DevImage, DevItem, DevItemId, DevMetrics, FeedbackId, FeedbackIntakeStatus,
        FeedbackReview, ImageId, ProdFeedback,
    },
    ports::{
        DevItemRepository, DevStoreError, DevStoreResult, FeedbackGateway, ImageStore,
        ImageUpload,
    },
};
use crate::error::ErrorKind;

#[derive(Debug)]
struct InMemoryDevState {
    items: HashMap<DevItemId, DevItem>,
    order: Vec<DevItemId>,
    feedback: HashMap<FeedbackId, ProdFeedback>,
    feedback_order: Vec<FeedbackId>,
    intake_enabled: bool,
}

impl Default for InMemoryDevState {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
            feedback: HashMap::new(),
            feedback_order: Vec::new(),
            intake_enabled: true,
        }
    }
}

impl InMemoryDevState {
    fn insert_item(&mut self, item: DevItem) {
        self.order.push(item.id());
        self.items.insert(item.id(), item);
    }

    fn pending_feedback(&self) -> impl Iterator<Item = &ProdFeedback> {
        self.feedback_order
            .iter()
            .filter_map(|id| self.feedback.get(id))
            .filter(|feedback| feedback.is_pending())
    }
}

/// Thread-safe in-memory dev tracker store.
pub struct InMemoryDevTracker<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryDevState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryDevTracker<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl InMemoryDevTracker<DefaultClock> {
    /// Creates an empty store stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryDevTracker<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryDevTracker<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryDevState::default())),
            clock,
        }
    }

    /// Queues feedback as if production had submitted it.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::Conflict`] when intake is switched off.
    pub fn submit_feedback(&self, feedback: ProdFeedback) -> DevStoreResult<FeedbackId> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.intake_enabled {
            return Err(DevStoreError::Conflict("feedback intake is disabled".to_owned()));
        }
        let id = feedback.id;
        state.feedback_order.push(id);
        state.feedback.insert(id, feedback);
        Ok(id)
    }

    /// Returns a feedback item in any status.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::Unavailable`] when the lock is poisoned.
    pub fn feedback(&self, id: FeedbackId) -> DevStoreResult<Option<ProdFeedback>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.feedback.get(&id).cloned())
    }
}

fn lock_error(err: impl ToString) -> DevStoreError {
    DevStoreError::unavailable(std::io::Error::other(err.to_string()))
}

fn domain_error(err: DevDomainError) -> DevStoreError {
    match err.kind() {
        ErrorKind::Validation => DevStoreError::Rejected(err.to_string()),
        _ => DevStoreError::Conflict(err.to_string()),
    }
}

#[async_trait]
impl<C> DevItemRepository for InMemoryDevTracker<C>
where
    C: Clock + Send + Sync,
{
    async fn store(&self, item: &DevItem) -> DevStoreResult<DevItem> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.items.contains_key(&item.id()) {
            return Err(DevStoreError::DuplicateItem(item.id()));
        }
        state.insert_item(item.clone());
        Ok(item.clone())
    }

    async fn update(&self, item: &DevItem) -> DevStoreResult<DevItem> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .items
            .get_mut(&item.id())
            .ok_or(DevStoreError::ItemNotFound(item.id()))?;
        *slot = item.clone();
        Ok(item.clone())
    }

    async fn find_by_id(&self, id: DevItemId) -> DevStoreResult<Option<DevItem>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.items.get(&id).cloned())
    }

    async fn list_all(&self) -> DevStoreResult<Vec<DevItem>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.items.get(id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: DevItemId) -> DevStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .items
            .remove(&id)
            .ok_or(DevStoreError::ItemNotFound(id))?;
        state.order.retain(|existing| *existing != id);
        Ok(())
    }

    async fn metrics(&self, now: DateTime<Utc>) -> DevStoreResult<DevMetrics> {
        let items = self.list_all().await?;
        Ok(DevMetrics::compute(&items, now))
    }
}

#[async_trait]
impl<C> ImageStore for InMemoryDevTracker<C>
where
    C: Clock + Send + Sync,
{
    async fn upload(&self, item_id: DevItemId, upload: &ImageUpload) -> DevStoreResult<DevImage> {
        if upload.bytes.is_empty() {
            return Err(DevStoreError::Rejected(format!(
                "image {} is empty",
                upload.filename
            )));
        }
        let mut state = self.state.write().map_err(lock_error)?;
        let item = state
            .items
            .get_mut(&item_id)
            .ok_or(DevStoreError::ItemNotFound(item_id))?;
        let image_id = ImageId::new();
        let image = DevImage {
            id: image_id,
            filename: upload.filename.clone(),
            url: format!("memory://dev-items/{item_id}/images/{image_id}"),
        };
        item.attach_image(image.clone(), &*self.clock);
        Ok(image)
    }

    async fn remove(&self, item_id: DevItemId, image_id: ImageId) -> DevStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let item = state
            .items
            .get_mut(&item_id)
            .ok_or(DevStoreError::ItemNotFound(item_id))?;
        if item.remove_image(image_id, &*self.clock) {
            Ok(())
        } else {
            Err(DevStoreError::ImageNotFound { item_id, image_id })
        }
    }
}

#[async_trait]
impl<C> FeedbackGateway for InMemoryDevTracker<C>
where
    C: Clock + Send + Sync,
{
    async fn intake_status(&self) -> DevStoreResult<FeedbackIntakeStatus> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(FeedbackIntakeStatus {
            enabled: state.intake_enabled,
            pending_count: state.pending_feedback().count(),
        })
    }

    async fn toggle_intake(&self) -> DevStoreResult<FeedbackIntakeStatus> {
        {
            let mut state = self.state.write().map_err(lock_error)?;
            state.intake_enabled = !state.intake_enabled;
        }
        self.intake_status().await
    }

    async fn list_pending(&self) -> DevStoreResult<Vec<ProdFeedback>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.pending_feedback().cloned().collect())
    }

    async fn review(
        &self,
        feedback_id: FeedbackId,
        review: &FeedbackReview,
    ) -> DevStoreResult<Option<DevItem>> {
        let mut state = self.state.write().map_err(lock_error)?;
        let feedback = state
            .feedback
            .get_mut(&feedback_id)
            .ok_or(DevStoreError::FeedbackNotFound(feedback_id))?;
        let created = feedback
            .apply_review(review, &*self.clock)
            .map_err(domain_error)?;
        if let Some(item) = &created {
            state.insert_item(item.clone());
        }
        Ok(created)
    }

    async fn pull(&self) -> DevStoreResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let pending: Vec<FeedbackId> = state.pending_feedback().map(|feedback| feedback.id).collect();
        let mut imported = Vec::with_capacity(pending.len());
        for id in pending {
            let Some(feedback) = state.feedback.get_mut(&id) else {
                continue;
            };
            match feedback.import(&*self.clock) {
                Ok(item) => imported.push(item),
                Err(err) => warn!(feedback_id = %id, error = %err, "feedback left pending"),
            }
        }
        let count = imported.len();
        for item in imported {
            state.insert_item(item);
        }
        Ok(count)
    }

    async fn delete(&self, feedback_id: FeedbackId) -> DevStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .feedback
            .remove(&feedback_id)
            .ok_or(DevStoreError::FeedbackNotFound(feedback_id))?;
        state.feedback_order.retain(|existing| *existing != feedback_id);
        Ok(())
    }
}
