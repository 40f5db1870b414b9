//! Dev item aggregate root.

use super::{DevAction, DevDomainError, DevItemId, DevPriority, DevStatus, ImageId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed dev item title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DevItemTitle(String);

impl DevItemTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::EmptyTitle`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, DevDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DevDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DevItemTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One failed test of a dev item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailRecord {
    /// One-based attempt number.
    pub attempt: u32,
    /// Why the test failed.
    pub note: String,
    /// When the failure was recorded.
    pub date: DateTime<Utc>,
}

/// Image attached to a dev item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevImage {
    /// Image identifier.
    pub id: ImageId,
    /// Original file name.
    pub filename: String,
    /// Where the stored image can be fetched.
    pub url: String,
}

/// Fields needed to create a dev item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevItemDraft {
    /// Item title.
    pub title: DevItemTitle,
    /// Free-form kind label such as `bug` or `feature`.
    pub item_type: String,
    /// Urgency.
    pub priority: DevPriority,
    /// Whether the item needs someone else's help.
    pub requires_collab: bool,
    /// Starting status; pending or backlog.
    pub status: DevStatus,
    /// Testing instructions.
    pub test_notes: String,
}

impl DevItemDraft {
    /// Drafts a pending, medium-priority item.
    #[must_use]
    pub fn new(title: DevItemTitle) -> Self {
        Self {
            title,
            item_type: String::new(),
            priority: DevPriority::default(),
            requires_collab: false,
            status: DevStatus::Pending,
            test_notes: String::new(),
        }
    }
}

/// Direct field edits. Unset fields are kept; status never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevItemPatch {
    /// Replacement title.
    pub title: Option<DevItemTitle>,
    /// Replacement kind label.
    pub item_type: Option<String>,
    /// Replacement priority.
    pub priority: Option<DevPriority>,
    /// Replacement collaboration flag.
    pub requires_collab: Option<bool>,
    /// Replacement latest failure note; blank clears it.
    pub fail_note: Option<String>,
    /// Replacement testing instructions.
    pub test_notes: Option<String>,
}

/// Parameter object for reconstructing a persisted dev item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDevItemData {
    /// Persisted identifier.
    pub id: DevItemId,
    /// Item title.
    pub title: DevItemTitle,
    /// Kind label.
    pub item_type: String,
    /// Urgency.
    pub priority: DevPriority,
    /// Current status.
    pub status: DevStatus,
    /// Collaboration flag.
    pub requires_collab: bool,
    /// Latest failure note.
    pub fail_note: Option<String>,
    /// Every recorded failure, oldest first.
    pub fail_note_history: Vec<FailRecord>,
    /// Testing instructions.
    pub test_notes: String,
    /// Attached images.
    pub images: Vec<DevImage>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Verification timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Dev item aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevItem {
    id: DevItemId,
    title: DevItemTitle,
    item_type: String,
    priority: DevPriority,
    status: DevStatus,
    requires_collab: bool,
    fail_note: Option<String>,
    fail_note_history: Vec<FailRecord>,
    test_notes: String,
    images: Vec<DevImage>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl DevItem {
    /// Creates an item from `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidInitialStatus`] unless the draft
    /// starts in pending or backlog.
    pub fn new(draft: DevItemDraft, clock: &impl Clock) -> Result<Self, DevDomainError> {
        if !matches!(draft.status, DevStatus::Pending | DevStatus::Backlog) {
            return Err(DevDomainError::InvalidInitialStatus(draft.status));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: DevItemId::new(),
            title: draft.title,
            item_type: draft.item_type.trim().to_owned(),
            priority: draft.priority,
            status: draft.status,
            requires_collab: draft.requires_collab,
            fail_note: None,
            fail_note_history: Vec::new(),
            test_notes: draft.test_notes,
            images: Vec::new(),
            created_at: timestamp,
            completed_at: None,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDevItemData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            item_type: data.item_type,
            priority: data.priority,
            status: data.status,
            requires_collab: data.requires_collab,
            fail_note: data.fail_note,
            fail_note_history: data.fail_note_history,
            test_notes: data.test_notes,
            images: data.images,
            created_at: data.created_at,
            completed_at: data.completed_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> DevItemId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &DevItemTitle {
        &self.title
    }

    /// Returns the kind label.
    #[must_use]
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> DevPriority {
        self.priority
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> DevStatus {
        self.status
    }

    /// Reports whether the item needs someone else's help.
    #[must_use]
    pub const fn requires_collab(&self) -> bool {
        self.requires_collab
    }

    /// Returns the latest failure note.
    #[must_use]
    pub fn fail_note(&self) -> Option<&str> {
        self.fail_note.as_deref()
    }

    /// Returns every recorded failure, oldest first.
    #[must_use]
    pub fn fail_note_history(&self) -> &[FailRecord] {
        &self.fail_note_history
    }

    /// Returns how many times the item has failed testing.
    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.fail_note_history.len()
    }

    /// Returns the testing instructions.
    #[must_use]
    pub fn test_notes(&self) -> &str {
        &self.test_notes
    }

    /// Returns the attached images.
    #[must_use]
    pub fn images(&self) -> &[DevImage] {
        &self.images
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the verification timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a pending item into progress.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] from any other status.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::Start, clock)
    }

    /// Hands a pending or in-progress item over for testing.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] from any other status.
    pub fn promote_to_testing(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::PromoteToTesting, clock)
    }

    /// Accepts a tested item and stamps the completion time.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] unless the item is in
    /// testing.
    pub fn verify(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::Verify, clock)?;
        self.completed_at = Some(self.updated_at);
        Ok(())
    }

    /// Sends a tested item back to pending and appends `comment` to the
    /// failure history. `requires_collab`, when given, replaces the flag.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::EmptyFailNote`] for a blank comment and
    /// [`DevDomainError::InvalidTransition`] unless the item is in testing.
    pub fn fail(
        &mut self,
        comment: &str,
        requires_collab: Option<bool>,
        clock: &impl Clock,
    ) -> Result<(), DevDomainError> {
        let note = comment.trim();
        if note.is_empty() {
            return Err(DevDomainError::EmptyFailNote);
        }
        self.transition(DevAction::Fail, clock)?;
        let attempt = u32::try_from(self.fail_note_history.len())
            .map_or(u32::MAX, |count| count.saturating_add(1));
        self.fail_note_history.push(FailRecord {
            attempt,
            note: note.to_owned(),
            date: self.updated_at,
        });
        self.fail_note = Some(note.to_owned());
        if let Some(flag) = requires_collab {
            self.requires_collab = flag;
        }
        Ok(())
    }

    /// Undoes a verification, returning the item to testing.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] unless the item is
    /// verified.
    pub fn reopen(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::Reopen, clock)?;
        self.completed_at = None;
        Ok(())
    }

    /// Parks an unverified item in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] from backlog or
    /// verified.
    pub fn to_backlog(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::ToBacklog, clock)
    }

    /// Schedules a backlog item as pending.
    ///
    /// # Errors
    ///
    /// Returns [`DevDomainError::InvalidTransition`] unless the item is in
    /// the backlog.
    pub fn from_backlog(&mut self, clock: &impl Clock) -> Result<(), DevDomainError> {
        self.transition(DevAction::FromBacklog, clock)
    }

    /// Applies direct field edits. Status is left alone.
    pub fn edit(&mut self, patch: DevItemPatch, clock: &impl Clock) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(item_type) = patch.item_type {
            self.item_type = item_type.trim().to_owned();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(flag) = patch.requires_collab {
            self.requires_collab = flag;
        }
        if let Some(note) = patch.fail_note {
            let trimmed = note.trim();
            self.fail_note = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        }
        if let Some(test_notes) = patch.test_notes {
            self.test_notes = test_notes;
        }
        self.updated_at = clock.utc();
    }

    /// Flips the collaboration flag and returns the new value.
    pub fn toggle_collab(&mut self, clock: &impl Clock) -> bool {
        self.requires_collab = !self.requires_collab;
        self.updated_at = clock.utc();
        self.requires_collab
    }

    /// Appends an image.
    pub fn attach_image(&mut self, image: DevImage, clock: &impl Clock) {
        self.images.push(image);
        self.updated_at = clock.utc();
    }

    /// Removes an image, reporting whether it was attached.
    pub fn remove_image(&mut self, image_id: ImageId, clock: &impl Clock) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.id != image_id);
        let removed = self.images.len() != before;
        if removed {
            self.updated_at = clock.utc();
        }
        removed
    }

    fn transition(&mut self, action: DevAction, clock: &impl Clock) -> Result<(), DevDomainError> {
        if !action.permits(self.status) {
            return Err(DevDomainError::InvalidTransition {
                item_id: self.id,
                status: self.status,
                action,
            });
        }
        self.status = action.target();
        self.updated_at = clock.utc();
        Ok(())
    }
}
