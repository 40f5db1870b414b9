//! Shared world state for task state transition BDD scenarios.

use std::sync::Arc;

use homestead::{
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::Task,
        services::{TaskLifecycleError, TaskLifecycleService},
    },
    worker::{
        adapters::memory::InMemoryWorkerRepository, domain::WorkerId,
        services::WorkerDirectoryService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryWorkerRepository, DefaultClock>;

/// Directory type used by the BDD world.
pub type TestDirectory =
    WorkerDirectoryService<InMemoryWorkerRepository, InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub service: TestTaskService,
    pub directory: TestDirectory,
    pub owner: Option<WorkerId>,
    pub other_worker: Option<WorkerId>,
    pub last_task: Option<Task>,
    pub last_transition_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskTransitionWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let workers = Arc::new(InMemoryWorkerRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            service: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&workers),
                Arc::clone(&clock),
            ),
            directory: WorkerDirectoryService::new(workers, tasks, clock),
            owner: None,
            other_worker: None,
            last_task: None,
            last_transition_result: None,
        }
    }

    /// Returns the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.last_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }

    /// Stores a transition outcome, keeping the latest successful state.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.last_task = Some(updated.clone());
        }
        self.last_transition_result = Some(result);
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
