//! Per-action registry of requests that are still outstanding.
//!
//! A second submission of the same action for the same record is refused
//! while the first one runs. Entries are released by [`InFlightGuard`] when
//! the request finishes, whether it succeeded or not.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Kind of request tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InFlightAction {
    /// Uploading an image to a dev item.
    UploadImage,
    /// Reviewing a production feedback item.
    ReviewFeedback,
    /// Deleting a production feedback item.
    DeleteFeedback,
    /// Bulk import of pending feedback.
    PullFeedback,
}

impl InFlightAction {
    /// Returns a stable label for logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UploadImage => "upload_image",
            Self::ReviewFeedback => "review_feedback",
            Self::DeleteFeedback => "delete_feedback",
            Self::PullFeedback => "pull_feedback",
        }
    }
}

impl fmt::Display for InFlightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type InFlightState = HashMap<InFlightAction, HashSet<Uuid>>;

/// Shared registry of in-flight requests keyed by action.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    state: Arc<Mutex<InFlightState>>,
}

impl InFlight {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as in flight for `action`.
    ///
    /// Returns `None` when the same action is already outstanding for the
    /// record.
    #[must_use]
    pub fn begin(&self, action: InFlightAction, id: Uuid) -> Option<InFlightGuard> {
        let inserted = self.lock().entry(action).or_default().insert(id);
        inserted.then(|| InFlightGuard {
            owner: self.clone(),
            action,
            id,
        })
    }

    /// Reports whether `action` is outstanding for `id`.
    #[must_use]
    pub fn is_in_flight(&self, action: InFlightAction, id: Uuid) -> bool {
        self.lock().get(&action).is_some_and(|ids| ids.contains(&id))
    }

    /// Returns every record with `action` outstanding.
    #[must_use]
    pub fn in_flight(&self, action: InFlightAction) -> Vec<Uuid> {
        self.lock()
            .get(&action)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    fn release(&self, action: InFlightAction, id: Uuid) {
        let mut state = self.lock();
        if let Some(ids) = state.get_mut(&action) {
            ids.remove(&id);
            if ids.is_empty() {
                state.remove(&action);
            }
        }
    }

    // Sets are left consistent at every await-free step, so a poisoned lock
    // is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, InFlightState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Releases its registry entry when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    owner: InFlight,
    action: InFlightAction,
    id: Uuid,
}

impl InFlightGuard {
    /// Returns the tracked action.
    #[must_use]
    pub const fn action(&self) -> InFlightAction {
        self.action
    }

    /// Returns the tracked record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.release(self.action, self.id);
    }
}
