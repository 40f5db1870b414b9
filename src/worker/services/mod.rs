//! Application services for the worker directory.

mod directory;

pub use directory::{
    CreateWorkerRequest, UpdateWorkerRequest, WorkerDirectoryError, WorkerDirectoryResult,
    WorkerDirectoryService,
};
