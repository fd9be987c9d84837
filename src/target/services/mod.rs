//! Service layer for the organization hierarchy.

mod hierarchy;

pub use hierarchy::{HierarchyError, HierarchyResult, HierarchyService};
