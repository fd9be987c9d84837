//! Submitted task store port.

use crate::target::domain::{DefineId, FlowDefine};
use crate::work::domain::{
    InstanceData, InstanceRequest, TaskBucket, WorkInstance, WorkTask, WorkTaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Contract for the store holding launched and completed tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists the tasks tagged with `bucket`'s store tag.
    ///
    /// The returned tasks carry no instance payload.
    async fn load_content(&self, bucket: TaskBucket) -> TaskStoreResult<Vec<WorkTask>>;

    /// Loads the instance payload of `task`.
    async fn load_instance(&self, task: &WorkTask) -> TaskStoreResult<InstanceData>;

    /// Finds the flow definition with `define_id`.
    async fn find_define(&self, define_id: DefineId) -> TaskStoreResult<Option<FlowDefine>>;

    /// Starts a flow instance from `request`.
    async fn create_instance(&self, request: &InstanceRequest) -> TaskStoreResult<WorkInstance>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The bucket is not served by the task store.
    #[error("bucket {0} is not held by the task store")]
    UnsupportedBucket(TaskBucket),

    /// The instance payload of a task could not be loaded.
    #[error("instance payload unavailable for task {0}")]
    InstanceUnavailable(WorkTaskId),

    /// The flow definition does not exist.
    #[error("flow definition not found: {0}")]
    UnknownDefine(DefineId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
