//! Homestead: household and farm operations dashboard core.
//!
//! This crate holds the lifecycle rules behind the dashboard: chores and
//! scheduled tasks handed to workers, supply requests moving through an
//! approval pipeline, and a development tracker that turns production
//! feedback into tested work items.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and remote stores
//! - **Adapters**: In-memory stores and REST clients for the backend
//! - **Services**: Orchestration, logging and change notification
//!
//! # Modules
//!
//! - [`worker`]: Worker directory and soft deactivation
//! - [`task`]: Task creation, assignment and progress tracking
//! - [`supply`]: Supply request approval pipeline
//! - [`dev_tracker`]: Dev items, image attachments and feedback intake
//! - [`backend`]: Shared REST client plumbing
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod backend;
pub mod config;
pub mod dev_tracker;
pub mod error;
pub mod inflight;
pub mod supply;
pub mod task;
pub mod telemetry;
pub mod worker;

#[cfg(test)]
mod test_support;
