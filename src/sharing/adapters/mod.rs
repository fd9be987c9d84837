//! Adapter implementations for sharing ports.

pub mod memory;
