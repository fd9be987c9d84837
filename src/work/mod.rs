//! Work task lifecycle: drafts, launched and completed tasks of one work.
//!
//! The module follows the same hexagonal split as [`crate::target`]: domain
//! types, port traits, in-memory adapters and the orchestrating services.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
