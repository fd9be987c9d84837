//! Port contracts for persisted shares.

pub mod share_store;

pub use share_store::{ShareStore, ShareStoreError, ShareStoreResult};
