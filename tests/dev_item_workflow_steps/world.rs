//! Shared world state for dev item workflow scenarios.

use std::sync::Arc;

use homestead::dev_tracker::{
    adapters::memory::InMemoryDevTracker,
    domain::{DevItem, FeedbackId},
    services::{DevItemError, DevItemService, FeedbackIntakeService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Tracker type shared by every port in the scenarios.
pub type TestTracker = InMemoryDevTracker<DefaultClock>;

/// Scenario world for dev item behaviour tests.
pub struct DevWorkflowWorld {
    pub tracker: Arc<TestTracker>,
    pub items: DevItemService<TestTracker, TestTracker, DefaultClock>,
    pub intake: FeedbackIntakeService<TestTracker>,
    pub current_item: Option<DevItem>,
    pub last_result: Option<Result<DevItem, DevItemError>>,
    pub pending_feedback: Option<FeedbackId>,
}

impl DevWorkflowWorld {
    /// Creates a world backed by an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        let tracker = Arc::new(InMemoryDevTracker::new());
        let items = DevItemService::new(
            Arc::clone(&tracker),
            Arc::clone(&tracker),
            Arc::new(DefaultClock),
        );
        let intake = FeedbackIntakeService::new(Arc::clone(&tracker))
            .with_in_flight(items.in_flight().clone());
        Self {
            tracker,
            items,
            intake,
            current_item: None,
            last_result: None,
            pending_feedback: None,
        }
    }

    /// Returns the item the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no item has been created yet.
    pub fn item(&self) -> Result<&DevItem, eyre::Report> {
        self.current_item
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing dev item in scenario world"))
    }
}

impl Default for DevWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DevWorkflowWorld {
    DevWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
