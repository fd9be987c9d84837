//! Port contracts for the work task lifecycle.
//!
//! Drafts and submitted tasks live in separate stores. The form resolver
//! supplies the apply context a new submission is shaped by.

pub mod draft_store;
pub mod form_resolver;
pub mod task_store;

pub use draft_store::{DraftStore, DraftStoreError, DraftStoreResult};
pub use form_resolver::{FormResolver, FormResolverError, FormResolverResult};
pub use task_store::{TaskStore, TaskStoreError, TaskStoreResult};
