//! Unit tests for the sharing module.
