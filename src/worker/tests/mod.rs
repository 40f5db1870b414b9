//! Unit tests for the worker directory.
