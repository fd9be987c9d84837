//! Domain model for work tasks, drafts and their form schema.
//!
//! A task's lifecycle bucket is never stored on the task. Drafts live in the
//! draft collection; launched and completed tasks live in the task store and
//! are told apart by the status tag they were queried with. [`TaskBucket`]
//! names the derived state so callers do not re-derive it.

mod bucket;
mod definition;
mod draft;
mod error;
mod form;
mod ids;
mod task;

pub use bucket::{RowAction, TaskBucket};
pub use definition::{InstanceRequest, WorkDefinition, WorkInstance};
pub use draft::Draft;
pub use error::{ParseRowActionError, ParseTaskBucketError, WorkDomainError};
pub use form::{ApplyContext, FieldSchema, FlowNode, Form, FormId, InstanceData};
pub use ids::{DraftId, InstanceId, WorkId, WorkTaskId};
pub use task::{TaskData, WorkTask, parse_update_time};
