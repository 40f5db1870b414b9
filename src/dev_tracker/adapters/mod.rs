//! Adapter implementations for the dev tracker ports.

pub mod http;
pub mod memory;
