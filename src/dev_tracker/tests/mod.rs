//! Unit tests for the dev tracker.
