//! Task lifecycle management for household and farm work.
//!
//! A task moves from not-started (assigned or unassigned) through
//! in-progress, blocked and completed. Progress is held as a single tagged
//! enum so a task can never be completed and blocked at once; the legacy
//! boolean flags only exist on the wire. Assignment to a worker is
//! orthogonal to progress. The module follows hexagonal architecture:
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
