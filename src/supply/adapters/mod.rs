//! Adapter implementations for the supply repository port.

pub mod http;
pub mod memory;
