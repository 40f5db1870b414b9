//! Gateway port to the production feedback queue.

use super::DevStoreResult;
use crate::dev_tracker::domain::{
    DevItem, FeedbackId, FeedbackIntakeStatus, FeedbackReview, ProdFeedback,
};
use async_trait::async_trait;

/// Production feedback contract.
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Reports whether production accepts feedback and how much is pending.
    async fn intake_status(&self) -> DevStoreResult<FeedbackIntakeStatus>;

    /// Flips whether production accepts feedback and returns the new status.
    async fn toggle_intake(&self) -> DevStoreResult<FeedbackIntakeStatus>;

    /// Lists feedback that is new or kicked back.
    async fn list_pending(&self) -> DevStoreResult<Vec<ProdFeedback>>;

    /// Records a review; approval returns the created dev item.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::FeedbackNotFound`](super::DevStoreError::FeedbackNotFound)
    /// for unknown feedback and
    /// [`DevStoreError::Conflict`](super::DevStoreError::Conflict) when it
    /// has already been decided.
    async fn review(
        &self,
        feedback_id: FeedbackId,
        review: &FeedbackReview,
    ) -> DevStoreResult<Option<DevItem>>;

    /// Imports every pending feedback item into the backlog and returns how
    /// many were imported.
    async fn pull(&self) -> DevStoreResult<usize>;

    /// Deletes feedback without reviewing it.
    ///
    /// # Errors
    ///
    /// Returns [`DevStoreError::FeedbackNotFound`](super::DevStoreError::FeedbackNotFound)
    /// for unknown feedback.
    async fn delete(&self, feedback_id: FeedbackId) -> DevStoreResult<()>;
}
