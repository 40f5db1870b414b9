//! Adapter implementations for the worker repository port.

pub mod http;
pub mod memory;
