//! Unit tests for the work module.
