//! Service layer for supply request intake and the approval pipeline.

use crate::error::ErrorKind;
use crate::supply::{
    domain::{
        ItemName, Quantity, SupplyAction, SupplyDomainError, SupplyEdit, SupplyRequest,
        SupplyRequestFilter, SupplyRequestId,
    },
    ports::{SupplyRepository, SupplyRepositoryError},
};
use crate::worker::{
    domain::WorkerId,
    ports::{WorkerRepository, WorkerRepositoryError},
};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for a new supply request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSupplyRequest {
    worker_id: WorkerId,
    item_name: String,
    quantity: Quantity,
    notes: String,
}

impl CreateSupplyRequest {
    /// Creates a request for one unit of `item_name`.
    #[must_use]
    pub fn new(worker_id: WorkerId, item_name: impl Into<String>) -> Self {
        Self {
            worker_id,
            item_name: item_name.into(),
            quantity: Quantity::ONE,
            notes: String::new(),
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the quantity from free-form input, coercing bad values to one.
    #[must_use]
    pub fn with_quantity_input(mut self, raw: &str) -> Self {
        self.quantity = Quantity::coerce(raw);
        self
    }

    /// Sets worker notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Partial edit of a supply request. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSupplyRequest {
    item_name: Option<String>,
    quantity: Option<Quantity>,
    notes: Option<String>,
}

impl EditSupplyRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the item name.
    #[must_use]
    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = Some(item_name.into());
        self
    }

    /// Replaces the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Replaces the quantity from free-form input.
    #[must_use]
    pub fn with_quantity_input(mut self, raw: &str) -> Self {
        self.quantity = Some(Quantity::coerce(raw));
        self
    }

    /// Replaces the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn into_edit(self) -> Result<SupplyEdit, SupplyDomainError> {
        Ok(SupplyEdit {
            item_name: self.item_name.map(ItemName::new).transpose()?,
            quantity: self.quantity,
            notes: self.notes,
        })
    }
}

/// Service-level errors for supply request operations.
#[derive(Debug, Error)]
pub enum SupplyRequestError {
    /// Domain validation or a pipeline rule failed.
    #[error(transparent)]
    Domain(#[from] SupplyDomainError),
    /// Supply repository operation failed.
    #[error(transparent)]
    Repository(#[from] SupplyRepositoryError),
    /// Worker lookup failed.
    #[error(transparent)]
    Worker(#[from] WorkerRepositoryError),
    /// The request does not exist.
    #[error("supply request not found: {0}")]
    NotFound(SupplyRequestId),
    /// The requesting worker does not exist.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),
    /// The requesting worker has been deactivated.
    #[error("worker {0} is inactive")]
    WorkerInactive(WorkerId),
}

impl SupplyRequestError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Worker(err) => err.kind(),
            Self::NotFound(_) | Self::WorkerNotFound(_) => ErrorKind::NotFound,
            Self::WorkerInactive(_) => ErrorKind::Conflict,
        }
    }
}

/// Result type for supply request operations.
pub type SupplyRequestResult<T> = Result<T, SupplyRequestError>;

/// Supply request orchestration service.
#[derive(Clone)]
pub struct SupplyRequestService<S, W, C>
where
    S: SupplyRepository,
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    requests: Arc<S>,
    workers: Arc<W>,
    clock: Arc<C>,
}

impl<S, W, C> SupplyRequestService<S, W, C>
where
    S: SupplyRepository,
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new supply request service.
    #[must_use]
    pub const fn new(requests: Arc<S>, workers: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            requests,
            workers,
            clock,
        }
    }

    /// Files a pending request for an active worker.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::Domain`] for a blank item name and
    /// [`SupplyRequestError::WorkerNotFound`] or
    /// [`SupplyRequestError::WorkerInactive`] for an unusable worker.
    pub async fn create(&self, request: CreateSupplyRequest) -> SupplyRequestResult<SupplyRequest> {
        let worker_id = request.worker_id;
        let outcome = self.create_request(request).await;
        match &outcome {
            Ok(stored) => info!(
                request_id = %stored.id(),
                %worker_id,
                item = %stored.item_name(),
                quantity = stored.quantity().get(),
                "filed supply request"
            ),
            Err(err) => warn!(%worker_id, error = %err, kind = %err.kind(), "supply request rejected"),
        }
        outcome
    }

    /// Returns a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::NotFound`] for unknown requests.
    pub async fn find(&self, request_id: SupplyRequestId) -> SupplyRequestResult<SupplyRequest> {
        self.requests
            .find_by_id(request_id)
            .await?
            .ok_or(SupplyRequestError::NotFound(request_id))
    }

    /// Applies a pipeline action, optionally recording an admin note.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::Domain`] when the action does not start
    /// from the current status; nothing is persisted in that case.
    pub async fn perform(
        &self,
        request_id: SupplyRequestId,
        action: SupplyAction,
        admin_note: Option<&str>,
    ) -> SupplyRequestResult<SupplyRequest> {
        let outcome = self.apply(request_id, action, admin_note).await;
        match &outcome {
            Ok(stored) => debug!(%request_id, %action, status = %stored.status(), "supply request moved"),
            Err(err) => warn!(
                %request_id,
                %action,
                error = %err,
                kind = %err.kind(),
                "supply request action failed"
            ),
        }
        outcome
    }

    /// Approves a pending request.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn approve(
        &self,
        request_id: SupplyRequestId,
        admin_note: Option<&str>,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::Approve, admin_note).await
    }

    /// Denies a pending request.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn deny(
        &self,
        request_id: SupplyRequestId,
        admin_note: Option<&str>,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::Deny, admin_note).await
    }

    /// Marks an approved request as bought.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn mark_purchased(
        &self,
        request_id: SupplyRequestId,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::MarkPurchased, None).await
    }

    /// Sends an approved request back to pending.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn revert_to_pending(
        &self,
        request_id: SupplyRequestId,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::RevertToPending, None).await
    }

    /// Marks a purchased request as delivered.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn mark_delivered(
        &self,
        request_id: SupplyRequestId,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::MarkDelivered, None).await
    }

    /// Sends a purchased request back to approved.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn revert_to_approved(
        &self,
        request_id: SupplyRequestId,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::RevertToApproved, None).await
    }

    /// Sends a delivered request back to purchased.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn revert_to_purchased(
        &self,
        request_id: SupplyRequestId,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::RevertToPurchased, None).await
    }

    /// Reopens a denied request.
    ///
    /// # Errors
    ///
    /// See [`Self::perform`].
    pub async fn reopen(
        &self,
        request_id: SupplyRequestId,
        admin_note: Option<&str>,
    ) -> SupplyRequestResult<SupplyRequest> {
        self.perform(request_id, SupplyAction::Reopen, admin_note).await
    }

    /// Edits item name, quantity or notes in any status.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::Domain`] for a blank replacement name.
    pub async fn edit(
        &self,
        request_id: SupplyRequestId,
        edit: EditSupplyRequest,
    ) -> SupplyRequestResult<SupplyRequest> {
        let changes = edit.into_edit()?;
        let mut request = self.find(request_id).await?;
        request.edit(changes, &*self.clock);
        let stored = self.requests.update(&request).await?;
        debug!(%request_id, "edited supply request");
        Ok(stored)
    }

    /// Deletes a request in any status.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::Repository`] when the store refuses.
    pub async fn delete(&self, request_id: SupplyRequestId) -> SupplyRequestResult<()> {
        self.requests.delete(request_id).await.inspect_err(|err| {
            warn!(%request_id, error = %err, "supply request deletion failed");
        })?;
        info!(%request_id, "deleted supply request");
        Ok(())
    }

    /// Lists requests selected by `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyRequestError::Repository`] when the store fails.
    pub async fn list(&self, filter: SupplyRequestFilter) -> SupplyRequestResult<Vec<SupplyRequest>> {
        let mut requests = self.requests.list(filter).await?;
        requests.sort_by_key(|request| Reverse(request.created_at()));
        Ok(requests)
    }

    async fn create_request(&self, request: CreateSupplyRequest) -> SupplyRequestResult<SupplyRequest> {
        let item_name = ItemName::new(request.item_name)?;
        let worker = self
            .workers
            .find_by_id(request.worker_id)
            .await?
            .ok_or(SupplyRequestError::WorkerNotFound(request.worker_id))?;
        if !worker.is_active() {
            return Err(SupplyRequestError::WorkerInactive(worker.id()));
        }
        let created = SupplyRequest::new(
            worker.id(),
            item_name,
            request.quantity,
            request.notes,
            &*self.clock,
        );
        Ok(self.requests.store(&created).await?)
    }

    async fn apply(
        &self,
        request_id: SupplyRequestId,
        action: SupplyAction,
        admin_note: Option<&str>,
    ) -> SupplyRequestResult<SupplyRequest> {
        let mut request = self.find(request_id).await?;
        request.apply(action, admin_note, &*self.clock)?;
        Ok(self.requests.update(&request).await?)
    }
}
