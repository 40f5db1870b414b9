//! Worker directory for household and farm staff.
//!
//! Workers own assigned tasks and submit supply requests. Removing a worker
//! is a soft delete: the record is deactivated so historical task
//! assignments stay intact. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
