//! Service layer for reviewing and importing production feedback.

use super::FeedbackPoller;
use crate::dev_tracker::{
    domain::{
        DevDomainError, DevItem, DevPriority, FeedbackId, FeedbackIntakeStatus, FeedbackReview,
        ProdFeedback,
    },
    ports::{DevStoreError, FeedbackGateway},
};
use crate::error::ErrorKind;
use crate::inflight::{InFlight, InFlightAction, InFlightGuard};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Service-level errors for feedback intake.
#[derive(Debug, Error)]
pub enum FeedbackIntakeError {
    /// The review is incomplete or the feedback was already decided.
    #[error(transparent)]
    Domain(#[from] DevDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] DevStoreError),
    /// The same action is already running for this feedback.
    #[error("{action} is already in progress for {id}")]
    AlreadyInFlight {
        /// Outstanding action.
        action: InFlightAction,
        /// Feedback identifier, or nil for a bulk pull.
        id: Uuid,
    },
}

impl FeedbackIntakeError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Store(err) => err.kind(),
            Self::AlreadyInFlight { .. } => ErrorKind::Conflict,
        }
    }
}

/// Result type for feedback intake operations.
pub type FeedbackIntakeResult<T> = Result<T, FeedbackIntakeError>;

/// Feedback intake orchestration service.
pub struct FeedbackIntakeService<G>
where
    G: FeedbackGateway,
{
    gateway: Arc<G>,
    in_flight: InFlight,
}

impl<G> Clone for FeedbackIntakeService<G>
where
    G: FeedbackGateway,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<G> FeedbackIntakeService<G>
where
    G: FeedbackGateway,
{
    /// Creates a new intake service with its own in-flight registry.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
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

    /// Reports whether production accepts feedback.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::Store`] when the gateway fails.
    pub async fn intake_status(&self) -> FeedbackIntakeResult<FeedbackIntakeStatus> {
        Ok(self.gateway.intake_status().await?)
    }

    /// Switches production intake on or off.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::Store`] when the gateway fails.
    pub async fn toggle_intake(&self) -> FeedbackIntakeResult<FeedbackIntakeStatus> {
        let status = self.gateway.toggle_intake().await?;
        info!(enabled = status.enabled, "feedback intake toggled");
        Ok(status)
    }

    /// Lists feedback waiting for review.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::Store`] when the gateway fails.
    pub async fn list_pending(&self) -> FeedbackIntakeResult<Vec<ProdFeedback>> {
        Ok(self.gateway.list_pending().await?)
    }

    /// Applies a review. Approval returns the created dev item.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::Domain`] for a decline or kickback
    /// without a note, [`FeedbackIntakeError::AlreadyInFlight`] while another
    /// review of the same feedback runs, and [`FeedbackIntakeError::Store`]
    /// when the gateway refuses.
    pub async fn review(
        &self,
        feedback_id: FeedbackId,
        review: &FeedbackReview,
    ) -> FeedbackIntakeResult<Option<DevItem>> {
        let outcome = self.submit_review(feedback_id, review).await;
        match &outcome {
            Ok(created) => info!(
                %feedback_id,
                action = %review.action,
                dev_item = ?created.as_ref().map(DevItem::id),
                "feedback reviewed"
            ),
            Err(err) => warn!(
                %feedback_id,
                action = %review.action,
                error = %err,
                kind = %err.kind(),
                "feedback review failed"
            ),
        }
        outcome
    }

    /// Approves feedback as a pending dev item at `priority`.
    ///
    /// # Errors
    ///
    /// See [`Self::review`].
    pub async fn approve(
        &self,
        feedback_id: FeedbackId,
        priority: DevPriority,
    ) -> FeedbackIntakeResult<Option<DevItem>> {
        self.review(feedback_id, &FeedbackReview::approve(priority))
            .await
    }

    /// Declines feedback with a note.
    ///
    /// # Errors
    ///
    /// See [`Self::review`].
    pub async fn decline(&self, feedback_id: FeedbackId, note: &str) -> FeedbackIntakeResult<()> {
        self.review(feedback_id, &FeedbackReview::decline(note))
            .await
            .map(drop)
    }

    /// Sends feedback back to the submitter with a note.
    ///
    /// # Errors
    ///
    /// See [`Self::review`].
    pub async fn kickback(&self, feedback_id: FeedbackId, note: &str) -> FeedbackIntakeResult<()> {
        self.review(feedback_id, &FeedbackReview::kickback(note))
            .await
            .map(drop)
    }

    /// Imports every pending feedback item into the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::AlreadyInFlight`] while another pull
    /// runs and [`FeedbackIntakeError::Store`] when the gateway fails.
    pub async fn pull(&self) -> FeedbackIntakeResult<usize> {
        let _guard = self.begin(InFlightAction::PullFeedback, Uuid::nil())?;
        let imported = self
            .gateway
            .pull()
            .await
            .inspect_err(|err| warn!(error = %err, "feedback pull failed"))?;
        info!(imported, "pulled feedback into the backlog");
        Ok(imported)
    }

    /// Deletes feedback without reviewing it.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackIntakeError::AlreadyInFlight`] while another
    /// deletion of the same feedback runs and [`FeedbackIntakeError::Store`]
    /// when the gateway refuses.
    pub async fn delete(&self, feedback_id: FeedbackId) -> FeedbackIntakeResult<()> {
        let _guard = self.begin(InFlightAction::DeleteFeedback, feedback_id.into_inner())?;
        self.gateway
            .delete(feedback_id)
            .await
            .inspect_err(|err| warn!(%feedback_id, error = %err, "feedback deletion failed"))?;
        info!(%feedback_id, "deleted feedback");
        Ok(())
    }

    async fn submit_review(
        &self,
        feedback_id: FeedbackId,
        review: &FeedbackReview,
    ) -> FeedbackIntakeResult<Option<DevItem>> {
        review.validate()?;
        let _guard = self.begin(InFlightAction::ReviewFeedback, feedback_id.into_inner())?;
        Ok(self.gateway.review(feedback_id, review).await?)
    }

    fn begin(&self, action: InFlightAction, id: Uuid) -> FeedbackIntakeResult<InFlightGuard> {
        self.in_flight
            .begin(action, id)
            .ok_or(FeedbackIntakeError::AlreadyInFlight { action, id })
    }
}

impl<G> FeedbackIntakeService<G>
where
    G: FeedbackGateway + 'static,
{
    /// Starts re-checking pending feedback every `interval`.
    #[must_use]
    pub fn spawn_poller(&self, interval: Duration) -> FeedbackPoller {
        FeedbackPoller::spawn(Arc::clone(&self.gateway), interval)
    }
}
