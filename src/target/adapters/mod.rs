//! Adapter implementations for hierarchy ports.

pub mod memory;
