//! Step definitions for dev item workflow scenarios.

pub mod world;

mod given;
mod then;
mod when;
