//! Unit tests for the task lifecycle.

mod adapter_tests;
mod state_transition_tests;
