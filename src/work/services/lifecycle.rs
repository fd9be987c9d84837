//! Work task lifecycle controller.
//!
//! The controller owns one work's three bucket views and the edit session
//! raised from them. Each bucket's loads are tagged with a per-bucket
//! generation; a load that finishes after a newer load of the same bucket
//! has started is discarded instead of overwriting fresher rows.

use super::aggregation::{drafts_for_work, load_instance_payloads, select_tasks};
use crate::config::OrgworkConfig;
use crate::target::domain::DefineId;
use crate::work::{
    domain::{
        ApplyContext, Draft, DraftId, FieldSchema, InstanceRequest, RowAction, TaskBucket,
        WorkDefinition, WorkId, WorkInstance, WorkTask,
    },
    ports::{
        DraftStore, DraftStoreError, FormResolver, FormResolverError, TaskStore, TaskStoreError,
    },
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Service-level errors for lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Draft store operation failed.
    #[error(transparent)]
    Drafts(#[from] DraftStoreError),
    /// Task store operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskStoreError),
    /// Apply context resolution failed.
    #[error(transparent)]
    Forms(#[from] FormResolverError),
    /// A save was requested without an open edit session.
    #[error("no edit session is open")]
    NoEditSession,
    /// The selected row is not present in the active bucket.
    #[error("row {0} is not in the active bucket")]
    SelectionNotFound(Uuid),
    /// The action is not offered on rows of the active bucket.
    #[error("action {action:?} is not offered in bucket {bucket}")]
    ActionNotOffered {
        /// Active bucket.
        bucket: TaskBucket,
        /// Rejected action.
        action: RowAction,
    },
    /// A draft-only command addressed a submitted task.
    #[error("row {0} is not a draft")]
    NotADraft(Uuid),
    /// The draft belongs to another work.
    #[error("draft {draft} belongs to another work than {work}")]
    ForeignDraft {
        /// Offending draft.
        draft: DraftId,
        /// Work the controller serves.
        work: WorkId,
    },
    /// The work's flow definition could not be found.
    #[error("flow definition not found: {0}")]
    DefinitionNotFound(DefineId),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// A row of a bucket view.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketRow {
    /// A draft from the draft collection.
    Draft(Draft),
    /// A submitted task with its instance payload.
    Task(WorkTask),
}

impl BucketRow {
    /// Returns the row identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::Draft(draft) => draft.id().into_inner(),
            Self::Task(task) => task.id().into_inner(),
        }
    }

    /// Returns `true` when `selected` names this row.
    ///
    /// Task rows also match their flow definition identifier.
    #[must_use]
    pub fn matches(&self, selected: Uuid) -> bool {
        match self {
            Self::Draft(draft) => draft.id().into_inner() == selected,
            Self::Task(task) => {
                task.id().into_inner() == selected || task.define_id().into_inner() == selected
            }
        }
    }

    /// Returns the draft, if this is a draft row.
    #[must_use]
    pub const fn as_draft(&self) -> Option<&Draft> {
        match self {
            Self::Draft(draft) => Some(draft),
            Self::Task(_) => None,
        }
    }

    /// Returns the task, if this is a task row.
    #[must_use]
    pub const fn as_task(&self) -> Option<&WorkTask> {
        match self {
            Self::Task(task) => Some(task),
            Self::Draft(_) => None,
        }
    }
}

/// Rendered state of one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketView {
    bucket: TaskBucket,
    header: Vec<FieldSchema>,
    rows: Vec<BucketRow>,
}

impl BucketView {
    fn empty(bucket: TaskBucket) -> Self {
        Self {
            bucket,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Returns the bucket the view shows.
    #[must_use]
    pub const fn bucket(&self) -> TaskBucket {
        self.bucket
    }

    /// Returns the tab label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.bucket.label()
    }

    /// Returns the table header derived from the apply context.
    #[must_use]
    pub fn header(&self) -> &[FieldSchema] {
        &self.header
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[BucketRow] {
        &self.rows
    }

    /// Returns the actions offered on every row.
    #[must_use]
    pub const fn actions(&self) -> &'static [RowAction] {
        self.bucket.row_actions()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the view has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of a bucket load.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketLoad {
    /// The load committed; the view is a snapshot of the new state.
    Ready(BucketView),
    /// A newer load started first; nothing was committed.
    Superseded {
        /// Bucket the discarded load was for.
        bucket: TaskBucket,
    },
}

impl BucketLoad {
    /// Returns the committed view, if any.
    #[must_use]
    pub const fn view(&self) -> Option<&BucketView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Superseded { .. } => None,
        }
    }
}

/// What the next save will do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditSession {
    /// Create a new draft.
    Add,
    /// Revise or view an existing row.
    Edit(BucketRow),
}

impl EditSession {
    /// Returns the draft being revised, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Edit(row) => row.as_draft(),
            Self::Add => None,
        }
    }
}

/// Row identifiers a change was raised for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection(Vec<Uuid>);

impl RowSelection {
    /// Creates a selection from `ids`.
    #[must_use]
    pub const fn new(ids: Vec<Uuid>) -> Self {
        Self(ids)
    }

    /// Creates an empty selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a selection of one row.
    #[must_use]
    pub fn single(id: Uuid) -> Self {
        Self(vec![id])
    }

    /// Returns the first selected identifier.
    #[must_use]
    pub fn first(&self) -> Option<Uuid> {
        self.0.first().copied()
    }
}

/// Outcome of [`WorkTaskController::on_change`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// An edit session was opened.
    SessionOpened(EditSession),
    /// A draft was removed and the draft bucket reloaded.
    DraftRemoved(BucketLoad),
    /// A draft was submitted.
    Submitted(WorkInstance),
}

/// Payload handed to a start-process presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct StartContext {
    /// Apply context the form is shaped by.
    pub apply: ApplyContext,
    /// Form data to prefill.
    pub data: Value,
    /// Summary text to prefill.
    pub content_text: String,
    /// Session the presenter saves into.
    pub session: EditSession,
}

#[derive(Debug)]
struct ControllerState {
    active: TaskBucket,
    views: HashMap<TaskBucket, BucketView>,
    generations: HashMap<TaskBucket, u64>,
    apply: Option<ApplyContext>,
    session: Option<EditSession>,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            active: TaskBucket::Draft,
            views: TaskBucket::ALL
                .into_iter()
                .map(|bucket| (bucket, BucketView::empty(bucket)))
                .collect(),
            generations: HashMap::new(),
            apply: None,
            session: None,
        }
    }

    fn header(&self) -> Vec<FieldSchema> {
        self.apply
            .as_ref()
            .map(ApplyContext::table_header)
            .unwrap_or_default()
    }

    fn begin_load(&mut self, bucket: TaskBucket) -> u64 {
        let generation = self.generations.entry(bucket).or_default();
        *generation += 1;
        *generation
    }

    fn is_current(&self, bucket: TaskBucket, generation: u64) -> bool {
        self.generations.get(&bucket) == Some(&generation)
    }

    fn view(&self, bucket: TaskBucket) -> BucketView {
        self.views
            .get(&bucket)
            .cloned()
            .unwrap_or_else(|| BucketView::empty(bucket))
    }
}

/// Lifecycle controller for one work.
///
/// Every read of the draft bucket after a write is a reloading read.
pub struct WorkTaskController<DS, TS, FR>
where
    DS: DraftStore,
    TS: TaskStore,
    FR: FormResolver,
{
    work: WorkDefinition,
    drafts: Arc<DS>,
    tasks: Arc<TS>,
    forms: Arc<FR>,
    config: OrgworkConfig,
    state: Mutex<ControllerState>,
}

impl<DS, TS, FR> WorkTaskController<DS, TS, FR>
where
    DS: DraftStore,
    TS: TaskStore,
    FR: FormResolver,
{
    /// Creates a controller with default configuration.
    #[must_use]
    pub fn new(work: WorkDefinition, drafts: Arc<DS>, tasks: Arc<TS>, forms: Arc<FR>) -> Self {
        Self::with_config(work, drafts, tasks, forms, OrgworkConfig::default())
    }

    /// Creates a controller with explicit configuration.
    #[must_use]
    pub fn with_config(
        work: WorkDefinition,
        drafts: Arc<DS>,
        tasks: Arc<TS>,
        forms: Arc<FR>,
        config: OrgworkConfig,
    ) -> Self {
        Self {
            work,
            drafts,
            tasks,
            forms,
            config,
            state: Mutex::new(ControllerState::new()),
        }
    }

    /// Returns the work the controller serves.
    #[must_use]
    pub const fn work(&self) -> &WorkDefinition {
        &self.work
    }

    /// Returns the active bucket.
    pub async fn active_bucket(&self) -> TaskBucket {
        self.state.lock().await.active
    }

    /// Returns a snapshot of `bucket`'s view.
    pub async fn view(&self, bucket: TaskBucket) -> BucketView {
        self.state.lock().await.view(bucket)
    }

    /// Returns a snapshot of the active bucket's view.
    pub async fn active_view(&self) -> BucketView {
        let state = self.state.lock().await;
        state.view(state.active)
    }

    /// Returns the open edit session, if any.
    pub async fn edit_session(&self) -> Option<EditSession> {
        self.state.lock().await.session.clone()
    }

    /// Returns the current apply context, if one was created.
    pub async fn apply_context(&self) -> Option<ApplyContext> {
        self.state.lock().await.apply.clone()
    }

    /// Opens the apply context for the work and refreshes every header.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Forms`] when resolution fails.
    pub async fn create_apply(
        &self,
        defaults: Option<&Value>,
    ) -> LifecycleResult<Option<ApplyContext>> {
        let apply = self.forms.resolve_apply(&self.work, defaults).await?;
        let mut state = self.state.lock().await;
        state.apply = apply.clone();
        let header = state.header();
        for view in state.views.values_mut() {
            view.header = header.clone();
        }
        debug!(
            work = %self.work.id(),
            resolved = apply.is_some(),
            columns = header.len(),
            "created apply context"
        );
        Ok(apply)
    }

    /// Makes `bucket` active and loads it from cache.
    ///
    /// # Errors
    ///
    /// Propagates load failures; see [`Self::load_bucket`].
    pub async fn select_bucket(&self, bucket: TaskBucket) -> LifecycleResult<BucketLoad> {
        let generation = {
            let mut state = self.state.lock().await;
            state.active = bucket;
            state.begin_load(bucket)
        };
        self.run_load(bucket, false, generation).await
    }

    /// Reloads the active bucket from its store.
    ///
    /// # Errors
    ///
    /// Propagates load failures; see [`Self::load_bucket`].
    pub async fn reload(&self) -> LifecycleResult<BucketLoad> {
        let active = self.active_bucket().await;
        self.load_bucket(active, true).await
    }

    /// Loads the rows of `bucket` and commits them unless a newer load of
    /// the same bucket has started meanwhile.
    ///
    /// # Errors
    ///
    /// Returns the store failure; the previously committed view is kept.
    pub async fn load_bucket(
        &self,
        bucket: TaskBucket,
        reload: bool,
    ) -> LifecycleResult<BucketLoad> {
        let generation = self.state.lock().await.begin_load(bucket);
        self.run_load(bucket, reload, generation).await
    }

    async fn run_load(
        &self,
        bucket: TaskBucket,
        reload: bool,
        generation: u64,
    ) -> LifecycleResult<BucketLoad> {
        let rows = match self.fetch_rows(bucket, reload).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(work = %self.work.id(), %bucket, error = %err, "bucket load failed");
                return Err(err);
            }
        };

        let mut state = self.state.lock().await;
        if !state.is_current(bucket, generation) {
            debug!(
                work = %self.work.id(),
                %bucket,
                generation,
                "discarding superseded bucket load"
            );
            return Ok(BucketLoad::Superseded { bucket });
        }
        let header = state.header();
        let view = state
            .views
            .entry(bucket)
            .or_insert_with(|| BucketView::empty(bucket));
        view.header = header;
        view.rows = rows;
        let snapshot = view.clone();
        info!(work = %self.work.id(), %bucket, rows = snapshot.len(), "loaded bucket");
        Ok(BucketLoad::Ready(snapshot))
    }

    async fn fetch_rows(
        &self,
        bucket: TaskBucket,
        reload: bool,
    ) -> LifecycleResult<Vec<BucketRow>> {
        if bucket.is_draft() {
            let drafts = self.drafts.all(reload).await?;
            return Ok(drafts_for_work(drafts, &self.work)
                .into_iter()
                .map(BucketRow::Draft)
                .collect());
        }
        let tasks = self.tasks.load_content(bucket).await?;
        let selected = select_tasks(tasks, self.work.define_id());
        let enriched = load_instance_payloads(self.tasks.as_ref(), selected).await?;
        Ok(enriched.into_iter().map(BucketRow::Task).collect())
    }

    /// Reacts to a row command raised from the active bucket.
    ///
    /// An empty selection opens an add session. Otherwise the first
    /// selected row is resolved against the active view and `action` is
    /// applied to it.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::SelectionNotFound`] when the row is not in
    /// the active view and [`LifecycleError::ActionNotOffered`] when the
    /// bucket does not offer `action`. Store failures propagate.
    pub async fn on_change(
        &self,
        selection: &RowSelection,
        action: RowAction,
    ) -> LifecycleResult<ChangeOutcome> {
        let Some(selected) = selection.first() else {
            return Ok(ChangeOutcome::SessionOpened(
                self.open_session(EditSession::Add).await,
            ));
        };

        let row = {
            let state = self.state.lock().await;
            let bucket = state.active;
            if !bucket.row_actions().contains(&action) {
                return Err(LifecycleError::ActionNotOffered { bucket, action });
            }
            state
                .views
                .get(&bucket)
                .and_then(|view| view.rows.iter().find(|row| row.matches(selected)))
                .cloned()
                .ok_or(LifecycleError::SelectionNotFound(selected))?
        };

        match action {
            RowAction::Remove => {
                let draft = row.as_draft().ok_or(LifecycleError::NotADraft(row.id()))?;
                Ok(ChangeOutcome::DraftRemoved(self.remove_draft(draft).await?))
            }
            RowAction::Submit => {
                let draft = row.as_draft().ok_or(LifecycleError::NotADraft(row.id()))?;
                Ok(ChangeOutcome::Submitted(self.submit_draft(draft).await?))
            }
            RowAction::Edit | RowAction::View => Ok(ChangeOutcome::SessionOpened(
                self.open_session(EditSession::Edit(row)).await,
            )),
        }
    }

    async fn open_session(&self, session: EditSession) -> EditSession {
        debug!(work = %self.work.id(), ?session, "opened edit session");
        self.state.lock().await.session = Some(session.clone());
        session
    }

    /// Returns the payload a start-process presenter opens with.
    ///
    /// Data comes from the draft under edit, falling back to the apply
    /// context's data. `None` until an apply context and a session exist.
    pub async fn start_context(&self) -> Option<StartContext> {
        let state = self.state.lock().await;
        let apply = state.apply.clone()?;
        let session = state.session.clone()?;
        let (data, content_text) = session.draft().map_or_else(
            || (apply.instance_data().data.clone(), String::new()),
            |draft| (draft.data().clone(), draft.content_text().to_owned()),
        );
        Some(StartContext {
            apply,
            data,
            content_text,
            session,
        })
    }

    /// Saves the open session's payload as a draft and reloads the draft
    /// bucket.
    ///
    /// An add session inserts a new draft; an edit session replaces the
    /// draft under edit, keeping its identifier. The session is closed on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NoEditSession`] without a session,
    /// [`LifecycleError::NotADraft`] when the session views a task, and
    /// store failures.
    pub async fn save_draft(
        &self,
        data: Value,
        content_text: impl Into<String>,
    ) -> LifecycleResult<BucketLoad> {
        let session = self
            .edit_session()
            .await
            .ok_or(LifecycleError::NoEditSession)?;
        match &session {
            EditSession::Add => {
                let draft = Draft::new(
                    &self.work,
                    data,
                    content_text,
                    self.config.draft_type_name.as_str(),
                );
                self.drafts.insert(&draft).await?;
                info!(work = %self.work.id(), draft = %draft.id(), "saved new draft");
            }
            EditSession::Edit(row) => {
                let current = row.as_draft().ok_or(LifecycleError::NotADraft(row.id()))?;
                self.ensure_own(current)?;
                let revised = current.revised(data, content_text);
                self.drafts.replace(&revised).await?;
                info!(work = %self.work.id(), draft = %revised.id(), "revised draft");
            }
        }
        self.state.lock().await.session = None;
        self.load_bucket(TaskBucket::Draft, true).await
    }

    /// Hard-deletes `draft` and reloads the draft bucket.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ForeignDraft`] for another work's draft and
    /// store failures.
    pub async fn remove_draft(&self, draft: &Draft) -> LifecycleResult<BucketLoad> {
        self.ensure_own(draft)?;
        let removed = self.drafts.remove(draft).await?;
        if removed {
            info!(work = %self.work.id(), draft = %draft.id(), "removed draft");
        } else {
            debug!(work = %self.work.id(), draft = %draft.id(), "draft already absent");
        }
        self.load_bucket(TaskBucket::Draft, true).await
    }

    /// Starts a flow instance from `draft` under the work's definition.
    ///
    /// The draft is left in place; callers remove it explicitly once the
    /// submission is confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::DefinitionNotFound`] when the definition is
    /// gone, [`LifecycleError::ForeignDraft`] for another work's draft and
    /// store failures.
    pub async fn submit_draft(&self, draft: &Draft) -> LifecycleResult<WorkInstance> {
        self.ensure_own(draft)?;
        let define_id = self.work.define_id();
        let define = self
            .tasks
            .find_define(define_id)
            .await?
            .ok_or(LifecycleError::DefinitionNotFound(define_id))?;
        let request = InstanceRequest::from_draft(draft, define.id());
        let instance = self.tasks.create_instance(&request).await?;
        warn!(
            work = %self.work.id(),
            draft = %draft.id(),
            instance = %instance.id,
            "submitted draft; draft retained until removed"
        );
        Ok(instance)
    }

    fn ensure_own(&self, draft: &Draft) -> LifecycleResult<()> {
        if draft.work_id() == self.work.id() {
            Ok(())
        } else {
            Err(LifecycleError::ForeignDraft {
                draft: draft.id(),
                work: self.work.id(),
            })
        }
    }
}
