//! Step definitions for supply pipeline scenarios.

pub mod world;

mod given;
mod then;
mod when;
