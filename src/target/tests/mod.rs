//! Unit tests for the hierarchy module.

mod service_tests;
