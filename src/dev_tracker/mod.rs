//! Internal engineering backlog and production feedback intake.
//!
//! Dev items move `backlog ↔ pending → in_progress → testing → verified`,
//! with failed tests sending an item back to pending and appending to its
//! failure history. Feedback raised in production is reviewed here and, when
//! approved, becomes a dev item.
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
