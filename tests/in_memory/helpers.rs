//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use homestead::{
    supply::{adapters::memory::InMemorySupplyRepository, services::SupplyRequestService},
    task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService},
    worker::{
        adapters::memory::InMemoryWorkerRepository,
        domain::Worker,
        services::{CreateWorkerRequest, WorkerDirectoryService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Task service over the in-memory stores.
pub type TestTasks =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryWorkerRepository, DefaultClock>;

/// Worker directory over the in-memory stores.
pub type TestDirectory =
    WorkerDirectoryService<InMemoryWorkerRepository, InMemoryTaskRepository, DefaultClock>;

/// Supply service over the in-memory stores.
pub type TestSupplies =
    SupplyRequestService<InMemorySupplyRepository, InMemoryWorkerRepository, DefaultClock>;

/// Services sharing one set of in-memory stores.
pub struct Household {
    pub tasks: TestTasks,
    pub directory: TestDirectory,
    pub supplies: TestSupplies,
}

impl Household {
    /// Registers an active worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory rejects the worker.
    pub async fn hire(&self, name: &str) -> Result<Worker, eyre::Report> {
        Ok(self
            .directory
            .create(CreateWorkerRequest::new(name).with_role("Field hand"))
            .await?)
    }
}

/// Provides services wired to fresh in-memory stores.
#[fixture]
pub fn household() -> Household {
    let workers = Arc::new(InMemoryWorkerRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    Household {
        tasks: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&workers),
            Arc::clone(&clock),
        ),
        directory: WorkerDirectoryService::new(Arc::clone(&workers), tasks, Arc::clone(&clock)),
        supplies: SupplyRequestService::new(
            Arc::new(InMemorySupplyRepository::new()),
            workers,
            clock,
        ),
    }
}
