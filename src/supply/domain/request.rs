//! Supply request aggregate root.

use super::{Quantity, SupplyAction, SupplyDomainError, SupplyRequestId, SupplyStatus};
use crate::worker::domain::WorkerId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed name of the requested item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Creates a validated item name.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyDomainError::EmptyItemName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, SupplyDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SupplyDomainError::EmptyItemName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editable fields of a supply request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyEdit {
    /// Replacement item name.
    pub item_name: Option<ItemName>,
    /// Replacement quantity.
    pub quantity: Option<Quantity>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// Supply request aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRequest {
    id: SupplyRequestId,
    worker_id: WorkerId,
    item_name: ItemName,
    quantity: Quantity,
    notes: String,
    admin_notes: Option<String>,
    status: SupplyStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted supply request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSupplyRequestData {
    /// Persisted identifier.
    pub id: SupplyRequestId,
    /// Requesting worker.
    pub worker_id: WorkerId,
    /// Requested item.
    pub item_name: ItemName,
    /// Requested quantity.
    pub quantity: Quantity,
    /// Worker notes.
    pub notes: String,
    /// Notes left by whoever handles the request.
    pub admin_notes: Option<String>,
    /// Current status.
    pub status: SupplyStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SupplyRequest {
    /// Creates a pending request.
    #[must_use]
    pub fn new(
        worker_id: WorkerId,
        item_name: ItemName,
        quantity: Quantity,
        notes: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SupplyRequestId::new(),
            worker_id,
            item_name,
            quantity,
            notes: notes.into(),
            admin_notes: None,
            status: SupplyStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSupplyRequestData) -> Self {
        Self {
            id: data.id,
            worker_id: data.worker_id,
            item_name: data.item_name,
            quantity: data.quantity,
            notes: data.notes,
            admin_notes: data.admin_notes,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> SupplyRequestId {
        self.id
    }

    /// Returns the requesting worker.
    #[must_use]
    pub const fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// Returns the requested item.
    #[must_use]
    pub const fn item_name(&self) -> &ItemName {
        &self.item_name
    }

    /// Returns the requested quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the worker notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns the admin notes.
    #[must_use]
    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> SupplyStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies `action`, optionally recording an admin note.
    ///
    /// A blank note leaves existing admin notes untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyDomainError::InvalidTransition`] when the action does
    /// not start from the current status.
    pub fn apply(
        &mut self,
        action: SupplyAction,
        admin_note: Option<&str>,
        clock: &impl Clock,
    ) -> Result<SupplyStatus, SupplyDomainError> {
        if action.source() != self.status {
            return Err(SupplyDomainError::InvalidTransition {
                request_id: self.id,
                status: self.status,
                action,
            });
        }
        self.status = action.target();
        if let Some(note) = admin_note.map(str::trim).filter(|note| !note.is_empty()) {
            self.admin_notes = Some(note.to_owned());
        }
        self.updated_at = clock.utc();
        Ok(self.status)
    }

    /// Edits descriptive fields. Allowed in every status.
    pub fn edit(&mut self, edit: SupplyEdit, clock: &impl Clock) {
        if let Some(item_name) = edit.item_name {
            self.item_name = item_name;
        }
        if let Some(quantity) = edit.quantity {
            self.quantity = quantity;
        }
        if let Some(notes) = edit.notes {
            self.notes = notes;
        }
        self.updated_at = clock.utc();
    }
}

/// Selection of supply requests for listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplyRequestFilter {
    /// Only requests from this worker.
    pub worker_id: Option<WorkerId>,
    /// Include delivered and denied requests.
    pub include_completed: bool,
}

impl SupplyRequestFilter {
    /// Selects open requests from every worker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the selection to one worker.
    #[must_use]
    pub const fn for_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Includes delivered and denied requests.
    #[must_use]
    pub const fn with_completed(mut self) -> Self {
        self.include_completed = true;
        self
    }

    /// Reports whether `request` is selected.
    #[must_use]
    pub fn matches(&self, request: &SupplyRequest) -> bool {
        self.worker_id.is_none_or(|worker_id| worker_id == request.worker_id())
            && (self.include_completed || !request.status().is_completed())
    }
}
