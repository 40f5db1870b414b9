//! Supply request lifecycle for materials workers ask for.
//!
//! A request moves `pending → approved → purchased → delivered`, or is
//! denied from pending. Every forward step has exactly one step back and no
//! stage can be skipped. Descriptive fields stay editable in every status.
//! The module follows hexagonal architecture:
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
