//! Feedback raised in production and its review.

use super::{
    DevDomainError, DevItem, DevItemDraft, DevItemTitle, DevPriority, DevStatus, FeedbackId,
    ParseDevValueError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the submitter was reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    /// Something is broken.
    Bug,
    /// Something new is wanted.
    Feature,
    /// Something existing could be better.
    Improvement,
}

impl FeedbackType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Improvement => "improvement",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a feedback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// Not reviewed yet.
    #[default]
    New,
    /// Sent back to the submitter for more detail.
    Kickback,
    /// Turned into a dev item.
    Approved,
    /// Rejected.
    Declined,
}

impl FeedbackStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Kickback => "kickback",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Reports whether the feedback still waits for a decision.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::New | Self::Kickback)
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer decision on a feedback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Turn the feedback into a dev item.
    Approve,
    /// Reject the feedback.
    Decline,
    /// Ask the submitter for more detail.
    Kickback,
}

impl ReviewAction {
    /// Every review action.
    pub const ALL: [Self; 3] = [Self::Approve, Self::Decline, Self::Kickback];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Decline => "decline",
            Self::Kickback => "kickback",
        }
    }

    /// Returns the feedback status the action leads to.
    #[must_use]
    pub const fn outcome(self) -> FeedbackStatus {
        match self {
            Self::Approve => FeedbackStatus::Approved,
            Self::Decline => FeedbackStatus::Declined,
            Self::Kickback => FeedbackStatus::Kickback,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewAction {
    type Error = ParseDevValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseDevValueError {
                field: "review action",
                value: value.to_owned(),
            })
    }
}

/// A review decision with its note and, for approvals, the priority of the
/// resulting dev item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReview {
    /// Decision.
    pub action: ReviewAction,
    /// Reviewer note; required for decline and kickback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Priority given to the dev item on approval.
    #[serde(default)]
    pub priority: DevPriority,
}

impl FeedbackReview {
    /// Approves at `priority`.
    #[must_use]
    pub const fn approve(priority: DevPriority) -> Self {
        Self {
            action: ReviewAction::Approve,
            note: None,
            priority,
        }
    }

    /// Declines with `note`.
    #[must_use]
    pub fn decline(note: impl Into<String>) -> Self {
        Self::with_note(ReviewAction::Decline, note)
    }

    /// Kicks back with `note`.
    #[must_use]
    pub fn kickback(note: impl Into<String>) -> Self {
        Self::with_note(ReviewAction::Kickback, note)
    }

    fn with_note(action: ReviewAction, note: impl Into<String>) -> Self {
        Self {
            action,
            note: Some(note.into()),
            priority: DevPriority::default(),
        }
    }

    /// Returns the trimmed note, if any.
    #[must_use]
    pub fn trimmed_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    /// Checks that decline and kickback carry a note.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::EmptyReviewNote`] when a note is required
    /// and missing.
    pub fn validate(&self) -> Result<(), DevDomainError> {
        let needs_note = !matches!(self.action, ReviewAction::Approve);
        if needs_note && self.trimmed_note().is_none() {
            return Err(DevDomainError::EmptyReviewNote(self.action));
        }
        Ok(())
    }
}

/// Feedback item submitted from the production system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdFeedback {
    /// Feedback identifier.
    pub id: FeedbackId,
    /// Short summary.
    pub title: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// What was reported.
    pub feedback_type: FeedbackType,
    /// Review state.
    #[serde(default)]
    pub status: FeedbackStatus,
    /// Who submitted it.
    #[serde(default)]
    pub submitted_by: Option<String>,
    /// Latest reviewer note.
    #[serde(default)]
    pub review_note: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl ProdFeedback {
    /// Creates an unreviewed feedback item.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        feedback_type: FeedbackType,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: FeedbackId::new(),
            title: title.into(),
            description: description.into(),
            feedback_type,
            status: FeedbackStatus::New,
            submitted_by: None,
            review_note: None,
            created_at: clock.utc(),
        }
    }

    /// Reports whether the feedback still waits for a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Applies a review. Approval returns the new pending dev item.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::FeedbackNotPending`] once the feedback has
    /// been approved or declined, [`DevDomainError::EmptyReviewNote`] for a
    /// decline or kickback without a note, and
    /// [`DevDomainError::EmptyTitle`] when approved feedback has no title.
    pub fn apply_review(
        &mut self,
        review: &FeedbackReview,
        clock: &impl Clock,
    ) -> Result<Option<DevItem>, DevDomainError> {
        self.ensure_pending()?;
        review.validate()?;
        let created = match review.action {
            ReviewAction::Approve => {
                Some(DevItem::from_feedback(self, review.priority, DevStatus::Pending, clock)?)
            }
            ReviewAction::Decline | ReviewAction::Kickback => None,
        };
        self.status = review.action.outcome();
        if let Some(note) = review.trimmed_note() {
            self.review_note = Some(note.to_owned());
        }
        Ok(created)
    }

    /// Imports the feedback straight into the backlog at medium priority.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::FeedbackNotPending`] once reviewed and
    /// [`DevDomainError::EmptyTitle`] when the feedback has no title.
    pub fn import(&mut self, clock: &impl Clock) -> Result<DevItem, DevDomainError> {
        self.ensure_pending()?;
        let item = DevItem::from_feedback(self, DevPriority::Medium, DevStatus::Backlog, clock)?;
        self.status = FeedbackStatus::Approved;
        Ok(item)
    }

    const fn ensure_pending(&self) -> Result<(), DevDomainError> {
        if self.is_pending() {
            return Ok(());
        }
        Err(DevDomainError::FeedbackNotPending {
            feedback_id: self.id,
            status: self.status,
        })
    }
}

impl DevItem {
    /// Builds a dev item from feedback. The description becomes the test
    /// notes and the feedback type the item type.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::EmptyTitle`] when the feedback has no title
    /// and [`DevDomainError::InvalidInitialStatus`] for a status other than
    /// pending or backlog.
    pub fn from_feedback(
        feedback: &ProdFeedback,
        priority: DevPriority,
        status: DevStatus,
        clock: &impl Clock,
    ) -> Result<Self, DevDomainError> {
        let draft = DevItemDraft {
            title: DevItemTitle::new(feedback.title.as_str())?,
            item_type: feedback.feedback_type.as_str().to_owned(),
            priority,
            requires_collab: false,
            status,
            test_notes: feedback.description.clone(),
        };
        Self::new(draft, clock)
    }
}

/// Whether production currently accepts feedback, and how much is waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackIntakeStatus {
    /// Production accepts new feedback.
    pub enabled: bool,
    /// Feedback waiting for review.
    #[serde(default)]
    pub pending_count: usize,
}
