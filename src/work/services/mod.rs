//! Work task orchestration services.

pub mod aggregation;
mod lifecycle;

pub use aggregation::{drafts_for_work, load_instance_payloads, select_tasks, sort_by_recency};
pub use lifecycle::{
    BucketLoad, BucketRow, BucketView, ChangeOutcome, EditSession, LifecycleError,
    LifecycleResult, RowSelection, StartContext, WorkTaskController,
};
