//! Port contracts for supply request management.

pub mod repository;

pub use repository::{SupplyRepository, SupplyRepositoryError, SupplyRepositoryResult};
