//! Adapter implementations for the task repository port.

pub mod http;
pub mod memory;
