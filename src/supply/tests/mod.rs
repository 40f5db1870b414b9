//! Unit tests for the supply request pipeline.

mod domain_tests;
