//! Adapter implementations for work ports.

pub mod memory;
