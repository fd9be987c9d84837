//! In-memory task store.

use crate::target::domain::{DefineId, FlowDefine};
use crate::work::{
    domain::{
        InstanceData, InstanceRequest, TaskBucket, TaskData, WorkInstance, WorkTask, WorkTaskId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store for launched and completed tasks.
///
/// Tasks seeded without an instance payload fail to load it, which lets
/// callers exercise partial payload failures. Instances are stamped with
/// the store's clock.
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    buckets: HashMap<TaskBucket, Vec<WorkTask>>,
    instances: HashMap<WorkTaskId, InstanceData>,
    defines: HashMap<DefineId, FlowDefine>,
    submitted: Vec<WorkInstance>,
}

impl InMemoryTaskStore {
    /// Creates an empty task store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty task store stamping instances with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    /// Files `task` under `bucket`, with an optional instance payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::UnsupportedBucket`] for the draft bucket and
    /// [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn seed(
        &self,
        bucket: TaskBucket,
        task: WorkTask,
        instance: Option<InstanceData>,
    ) -> TaskStoreResult<()> {
        if bucket.is_draft() {
            return Err(TaskStoreError::UnsupportedBucket(bucket));
        }
        let mut state = self.write()?;
        if let Some(payload) = instance {
            state.instances.insert(task.id(), payload);
        }
        state.buckets.entry(bucket).or_default().push(task);
        Ok(())
    }

    /// Registers a flow definition submissions may run under.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn register_define(&self, define: FlowDefine) -> TaskStoreResult<()> {
        self.write()?.defines.insert(define.id(), define);
        Ok(())
    }

    /// Returns the instances created so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn submitted(&self) -> TaskStoreResult<Vec<WorkInstance>> {
        Ok(self.read()?.submitted.clone())
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn load_content(&self, bucket: TaskBucket) -> TaskStoreResult<Vec<WorkTask>> {
        if bucket.is_draft() {
            return Err(TaskStoreError::UnsupportedBucket(bucket));
        }
        Ok(self
            .read()?
            .buckets
            .get(&bucket)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_instance(&self, task: &WorkTask) -> TaskStoreResult<InstanceData> {
        self.read()?
            .instances
            .get(&task.id())
            .cloned()
            .ok_or(TaskStoreError::InstanceUnavailable(task.id()))
    }

    async fn find_define(&self, define_id: DefineId) -> TaskStoreResult<Option<FlowDefine>> {
        Ok(self.read()?.defines.get(&define_id).cloned())
    }

    async fn create_instance(&self, request: &InstanceRequest) -> TaskStoreResult<WorkInstance> {
        let mut state = self.write()?;
        if !state.defines.contains_key(&request.define_id) {
            return Err(TaskStoreError::UnknownDefine(request.define_id));
        }
        let instance = WorkInstance::from_request(request, self.clock.utc());
        let task = WorkTask::new(
            request.define_id,
            request.work_id,
            TaskData::new(
                request.content_text.clone(),
                Some(instance.created_at.to_rfc3339()),
            ),
        );
        state.instances.insert(
            task.id(),
            InstanceData::default().with_data(request.data.clone()),
        );
        state
            .buckets
            .entry(TaskBucket::Launched)
            .or_default()
            .push(task);
        state.submitted.push(instance.clone());
        Ok(instance)
    }
}
