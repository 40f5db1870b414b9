//! Step definitions for task state transition scenarios.

pub mod world;

mod given;
mod then;
mod when;
