//! Port contracts for the organization hierarchy.
//!
//! Ports define infrastructure-agnostic interfaces used by hierarchy services.

pub mod directory;

pub use directory::{
    DirectoryStore, DirectoryStoreError, DirectoryStoreResult, Page, PageRequest,
};
