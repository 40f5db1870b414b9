//! Shared world state for supply pipeline scenarios.

use std::sync::Arc;

use homestead::{
    supply::{
        adapters::memory::InMemorySupplyRepository,
        domain::SupplyRequest,
        services::{SupplyRequestError, SupplyRequestService},
    },
    task::adapters::memory::InMemoryTaskRepository,
    worker::{
        adapters::memory::InMemoryWorkerRepository, domain::Worker,
        services::WorkerDirectoryService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Supply service type used by the scenarios.
pub type TestSupplyService =
    SupplyRequestService<InMemorySupplyRepository, InMemoryWorkerRepository, DefaultClock>;

/// Worker directory type used by the scenarios.
pub type TestDirectory =
    WorkerDirectoryService<InMemoryWorkerRepository, InMemoryTaskRepository, DefaultClock>;

/// Scenario world for supply pipeline behaviour tests.
pub struct SupplyPipelineWorld {
    pub supplies: TestSupplyService,
    pub directory: TestDirectory,
    pub worker: Option<Worker>,
    pub current_request: Option<SupplyRequest>,
    pub last_result: Option<Result<SupplyRequest, SupplyRequestError>>,
}

impl SupplyPipelineWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let workers = Arc::new(InMemoryWorkerRepository::new());
        let clock = Arc::new(DefaultClock);
        let supplies = SupplyRequestService::new(
            Arc::new(InMemorySupplyRepository::new()),
            Arc::clone(&workers),
            Arc::clone(&clock),
        );
        let directory =
            WorkerDirectoryService::new(workers, Arc::new(InMemoryTaskRepository::new()), clock);
        Self {
            supplies,
            directory,
            worker: None,
            current_request: None,
            last_result: None,
        }
    }

    /// Returns the worker the scenario acts for.
    ///
    /// # Errors
    ///
    /// Returns an error when no worker has been registered yet.
    pub fn worker(&self) -> Result<&Worker, eyre::Report> {
        self.worker
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing worker in scenario world"))
    }

    /// Returns the request the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no request has been filed yet.
    pub fn request(&self) -> Result<&SupplyRequest, eyre::Report> {
        self.current_request
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing supply request in scenario world"))
    }

    /// Stores an action outcome, keeping the latest successful state.
    pub fn record(&mut self, result: Result<SupplyRequest, SupplyRequestError>) {
        if let Ok(ref updated) = result {
            self.current_request = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for SupplyPipelineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SupplyPipelineWorld {
    SupplyPipelineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
