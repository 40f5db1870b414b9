//! Worker aggregate and its read model.

use super::{WorkerDomainError, WorkerId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed worker display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerName(String);

impl WorkerName {
    /// Creates a validated worker name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerDomainError::EmptyName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkerDomainError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editable contact and role details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Free-text role, such as "farm hand" or "gardener".
    pub role: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Free-form notes.
    pub notes: String,
}

/// Worker aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    name: WorkerName,
    profile: WorkerProfile,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkerData {
    /// Persisted identifier.
    pub id: WorkerId,
    /// Persisted display name.
    pub name: WorkerName,
    /// Persisted profile.
    pub profile: WorkerProfile,
    /// Whether the worker is active.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    /// Creates a new active worker.
    #[must_use]
    pub fn new(name: WorkerName, profile: WorkerProfile, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkerId::new(),
            name,
            profile,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a worker from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            profile: data.profile,
            active: data.active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the worker identifier.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &WorkerName {
        &self.name
    }

    /// Returns contact and role details.
    #[must_use]
    pub const fn profile(&self) -> &WorkerProfile {
        &self.profile
    }

    /// Reports whether the worker is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
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

    /// Renames the worker.
    pub fn rename(&mut self, name: WorkerName, clock: &impl Clock) {
        self.name = name;
        self.updated_at = clock.utc();
    }

    /// Replaces contact and role details.
    pub fn update_profile(&mut self, profile: WorkerProfile, clock: &impl Clock) {
        self.profile = profile;
        self.updated_at = clock.utc();
    }

    /// Soft-deletes the worker. Assigned tasks are left untouched.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.active = false;
        self.updated_at = clock.utc();
    }

    /// Restores a deactivated worker.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.active = true;
        self.updated_at = clock.utc();
    }
}

/// Worker together with the number of open tasks assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    /// The worker record.
    pub worker: Worker,
    /// Non-completed tasks currently assigned to the worker.
    pub task_count: usize,
}
