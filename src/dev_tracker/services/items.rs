//! Service layer for dev item lifecycle, attachments and dashboard views.

use crate::dev_tracker::{
    domain::{
        DevDomainError, DevImage, DevItem, DevItemDraft, DevItemId, DevItemPatch, DevItemTitle,
        DevMetrics, DevPriority, DevStatus, ImageId, ImplementSort, TestingSort, VerifiedGroup,
        group_verified, sort_testing, sort_to_implement,
    },
    ports::{DevItemRepository, DevStoreError, ImageStore, ImageUpload},
};
use crate::error::ErrorKind;
use crate::inflight::{InFlight, InFlightAction};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for a new dev item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDevItemRequest {
    title: String,
    item_type: String,
    priority: DevPriority,
    requires_collab: bool,
    status: DevStatus,
    test_notes: String,
}

impl CreateDevItemRequest {
    /// Creates a request for a pending, medium-priority item.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            item_type: String::new(),
            priority: DevPriority::default(),
            requires_collab: false,
            status: DevStatus::Pending,
            test_notes: String::new(),
        }
    }

    /// Sets the kind label.
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = item_type.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: DevPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Flags the item as needing collaboration.
    #[must_use]
    pub const fn with_collab(mut self, requires_collab: bool) -> Self {
        self.requires_collab = requires_collab;
        self
    }

    /// Sets the starting status. Only pending and backlog are accepted.
    #[must_use]
    pub const fn with_status(mut self, status: DevStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the testing instructions.
    #[must_use]
    pub fn with_test_notes(mut self, test_notes: impl Into<String>) -> Self {
        self.test_notes = test_notes.into();
        self
    }

    fn into_draft(self) -> Result<DevItemDraft, DevDomainError> {
        Ok(DevItemDraft {
            title: DevItemTitle::new(self.title)?,
            item_type: self.item_type,
            priority: self.priority,
            requires_collab: self.requires_collab,
            status: self.status,
            test_notes: self.test_notes,
        })
    }
}

/// Partial edit of a dev item. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDevItemRequest {
    title: Option<String>,
    item_type: Option<String>,
    priority: Option<DevPriority>,
    requires_collab: Option<bool>,
    fail_note: Option<String>,
    test_notes: Option<String>,
}

impl EditDevItemRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the kind label.
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: DevPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the collaboration flag.
    #[must_use]
    pub const fn with_collab(mut self, requires_collab: bool) -> Self {
        self.requires_collab = Some(requires_collab);
        self
    }

    /// Replaces the latest failure note; blank clears it.
    #[must_use]
    pub fn with_fail_note(mut self, fail_note: impl Into<String>) -> Self {
        self.fail_note = Some(fail_note.into());
        self
    }

    /// Replaces the testing instructions.
    #[must_use]
    pub fn with_test_notes(mut self, test_notes: impl Into<String>) -> Self {
        self.test_notes = Some(test_notes.into());
        self
    }

    fn into_patch(self) -> Result<DevItemPatch, DevDomainError> {
        Ok(DevItemPatch {
            title: self.title.map(DevItemTitle::new).transpose()?,
            item_type: self.item_type,
            priority: self.priority,
            requires_collab: self.requires_collab,
            fail_note: self.fail_note,
            test_notes: self.test_notes,
        })
    }
}

/// Service-level errors for dev item operations.
#[derive(Debug, Error)]
pub enum DevItemError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] DevDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] DevStoreError),
    /// The item does not exist.
    #[error("dev item not found: {0}")]
    NotFound(DevItemId),
    /// The same action is already running for this item.
    #[error("{action} is already in progress for dev item {item_id}")]
    AlreadyInFlight {
        /// Outstanding action.
        action: InFlightAction,
        /// Item identifier.
        item_id: DevItemId,
    },
}

impl DevItemError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Store(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyInFlight { .. } => ErrorKind::Conflict,
        }
    }
}

/// Result type for dev item operations.
pub type DevItemResult<T> = Result<T, DevItemError>;

/// Dev item orchestration service.
#[derive(Clone)]
pub struct DevItemService<R, I, C>
where
    R: DevItemRepository,
    I: ImageStore,
    C: Clock + Send + Sync,
{
    items: Arc<R>,
    images: Arc<I>,
    clock: Arc<C>,
    in_flight: InFlight,
}

impl<R, I, C> DevItemService<R, I, C>
where
    R: DevItemRepository,
    I: ImageStore,
    C: Clock + Send + Sync,
{
    /// Creates a new dev item service with its own in-flight registry.
    #[must_use]
    pub fn new(items: Arc<R>, images: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            items,
            images,
            clock,
            in_flight: InFlight::new(),
        }
    }

    /// Shares `in_flight` with other services.
    #[must_use]
    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Returns the in-flight registry.
    #[must_use]
    pub const fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Creates an item in pending or backlog.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] for a blank title or any other
    /// starting status.
    pub async fn create(&self, request: CreateDevItemRequest) -> DevItemResult<DevItem> {
        let created = DevItem::new(request.into_draft()?, &*self.clock)
            .inspect_err(|err| warn!(error = %err, "dev item rejected"))?;
        let stored = self.items.store(&created).await?;
        info!(
            item_id = %stored.id(),
            priority = %stored.priority(),
            status = %stored.status(),
            "created dev item"
        );
        Ok(stored)
    }

    /// Returns an item by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::NotFound`] for unknown items.
    pub async fn find(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or(DevItemError::NotFound(item_id))
    }

    /// Starts a pending item.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] from any other status.
    pub async fn start(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "start", |item, clock| item.start(clock))
            .await
    }

    /// Hands a pending or in-progress item over for testing.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] from any other status.
    pub async fn promote_to_testing(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "promote_to_testing", |item, clock| {
            item.promote_to_testing(clock)
        })
        .await
    }

    /// Accepts a tested item.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] unless the item is in testing.
    pub async fn verify(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "verify", |item, clock| item.verify(clock))
            .await
    }

    /// Records a failed test and sends the item back to pending.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] for a blank comment or when the item
    /// is not in testing.
    pub async fn fail(
        &self,
        item_id: DevItemId,
        comment: &str,
        requires_collab: Option<bool>,
    ) -> DevItemResult<DevItem> {
        self.mutate(item_id, "fail", |item, clock| {
            item.fail(comment, requires_collab, clock)
        })
        .await
    }

    /// Undoes a verification.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] unless the item is verified.
    pub async fn reopen(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "reopen", |item, clock| item.reopen(clock))
            .await
    }

    /// Parks an unverified item in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] from backlog or verified.
    pub async fn to_backlog(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "to_backlog", |item, clock| item.to_backlog(clock))
            .await
    }

    /// Schedules a backlog item.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] unless the item is in the backlog.
    pub async fn from_backlog(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "from_backlog", |item, clock| item.from_backlog(clock))
            .await
    }

    /// Edits fields without touching the status.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Domain`] for a blank replacement title.
    pub async fn edit(
        &self,
        item_id: DevItemId,
        edit: EditDevItemRequest,
    ) -> DevItemResult<DevItem> {
        let patch = edit.into_patch()?;
        self.mutate(item_id, "edit", |item, clock| {
            item.edit(patch, clock);
            Ok(())
        })
        .await
    }

    /// Flips the collaboration flag.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::NotFound`] for unknown items.
    pub async fn toggle_collab(&self, item_id: DevItemId) -> DevItemResult<DevItem> {
        self.mutate(item_id, "toggle_collab", |item, clock| {
            item.toggle_collab(clock);
            Ok(())
        })
        .await
    }

    /// Uploads an image and attaches it to the item. A failed upload is
    /// reported and not retried.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::AlreadyInFlight`] while another upload for
    /// the same item is running, or [`DevItemError::Store`] when the upload
    /// fails.
    pub async fn attach_image(
        &self,
        item_id: DevItemId,
        upload: &ImageUpload,
    ) -> DevItemResult<DevImage> {
        let _guard = self
            .in_flight
            .begin(InFlightAction::UploadImage, item_id.into_inner())
            .ok_or(DevItemError::AlreadyInFlight {
                action: InFlightAction::UploadImage,
                item_id,
            })?;
        let image = self
            .images
            .upload(item_id, upload)
            .await
            .inspect_err(|err| {
                warn!(%item_id, filename = %upload.filename, error = %err, "image upload failed");
            })?;
        info!(%item_id, image_id = %image.id, filename = %image.filename, "attached image");
        Ok(image)
    }

    /// Detaches an image.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the image is not attached.
    pub async fn remove_image(&self, item_id: DevItemId, image_id: ImageId) -> DevItemResult<()> {
        self.images
            .remove(item_id, image_id)
            .await
            .inspect_err(|err| warn!(%item_id, %image_id, error = %err, "image removal failed"))?;
        debug!(%item_id, %image_id, "removed image");
        Ok(())
    }

    /// Deletes an item in any status.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store refuses.
    pub async fn delete(&self, item_id: DevItemId) -> DevItemResult<()> {
        self.items
            .delete(item_id)
            .await
            .inspect_err(|err| warn!(%item_id, error = %err, "dev item deletion failed"))?;
        info!(%item_id, "deleted dev item");
        Ok(())
    }

    /// Lists every item in store order.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn list_all(&self) -> DevItemResult<Vec<DevItem>> {
        Ok(self.items.list_all().await?)
    }

    /// Returns dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn metrics(&self) -> DevItemResult<DevMetrics> {
        Ok(self.items.metrics(self.clock.utc()).await?)
    }

    /// Lists backlog items in store order.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn backlog(&self) -> DevItemResult<Vec<DevItem>> {
        self.with_status(|status| status == DevStatus::Backlog).await
    }

    /// Lists pending and in-progress items in `sort` order.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn to_implement(&self, sort: ImplementSort) -> DevItemResult<Vec<DevItem>> {
        let mut items = self.with_status(DevStatus::is_to_implement).await?;
        sort_to_implement(&mut items, sort);
        Ok(items)
    }

    /// Lists items waiting for a test in `sort` order.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn testing(&self, sort: TestingSort) -> DevItemResult<Vec<DevItem>> {
        let mut items = self
            .with_status(|status| status == DevStatus::Testing)
            .await?;
        sort_testing(&mut items, sort);
        Ok(items)
    }

    /// Lists verified items grouped by completion day.
    ///
    /// # Errors
    ///
    /// Returns [`DevItemError::Store`] when the store fails.
    pub async fn verified(&self) -> DevItemResult<Vec<VerifiedGroup>> {
        let items = self
            .with_status(|status| status == DevStatus::Verified)
            .await?;
        Ok(group_verified(items))
    }

    async fn with_status(&self, keep: impl Fn(DevStatus) -> bool) -> DevItemResult<Vec<DevItem>> {
        let mut items = self.items.list_all().await?;
        items.retain(|item| keep(item.status()));
        Ok(items)
    }

    async fn mutate<F>(
        &self,
        item_id: DevItemId,
        operation: &'static str,
        change: F,
    ) -> DevItemResult<DevItem>
    where
        F: FnOnce(&mut DevItem, &C) -> Result<(), DevDomainError>,
    {
        let outcome = self.apply(item_id, change).await;
        match &outcome {
            Ok(stored) => debug!(%item_id, operation, status = %stored.status(), "dev item updated"),
            Err(err) => warn!(
                %item_id,
                operation,
                error = %err,
                kind = %err.kind(),
                "dev item operation failed"
            ),
        }
        outcome
    }

    async fn apply<F>(&self, item_id: DevItemId, change: F) -> DevItemResult<DevItem>
    where
        F: FnOnce(&mut DevItem, &C) -> Result<(), DevDomainError>,
    {
        let mut item = self.find(item_id).await?;
        change(&mut item, self.clock.as_ref())?;
        Ok(self.items.update(&item).await?)
    }
}
