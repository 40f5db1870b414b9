//! Port contracts for the worker directory.

pub mod repository;

pub use repository::{WorkerRepository, WorkerRepositoryError, WorkerRepositoryResult};
