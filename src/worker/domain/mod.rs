//! Domain model for the worker directory.

mod error;
mod ids;
mod worker;

pub use error::WorkerDomainError;
pub use ids::WorkerId;
pub use worker::{PersistedWorkerData, Worker, WorkerName, WorkerProfile, WorkerSummary};
