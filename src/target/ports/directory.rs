//! Directory store port: targets, identities, membership edges and the
//! space-level bindings (authority, flows, markets) that hang off them.

use crate::target::domain::{
    AuthorityNode, DefineId, FlowDefine, Identity, IdentityId, MarketId, Target, TargetId,
    TargetType,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory store operations.
pub type DirectoryStoreResult<T> = Result<T, DirectoryStoreError>;

/// Paging parameters for member listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of records to skip.
    pub offset: usize,
    /// Maximum number of records to return.
    pub limit: usize,
    /// Case-insensitive substring filter on name or code; empty matches all.
    pub filter: String,
}

impl PageRequest {
    /// Creates an unfiltered page request.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            filter: String::new(),
        }
    }

    /// Sets the name/code filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// A page of results with the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records in this page.
    pub items: Vec<T>,
    /// Total number of matching records.
    pub total: usize,
    /// Offset the page starts at.
    pub offset: usize,
    /// Limit applied to the page.
    pub limit: usize,
}

/// Directory persistence contract.
///
/// Membership commands are all-or-nothing from the caller's perspective: the
/// store returns `false` when it refuses a batch and `true` when it applied it.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Stores a new target, optionally nested beneath `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::DuplicateTarget`] when the ID exists.
    async fn insert_target(&self, target: &Target, parent: Option<TargetId>)
    -> DirectoryStoreResult<()>;

    /// Persists changes to an existing target.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::TargetNotFound`] when the target does
    /// not exist.
    async fn update_target(&self, target: &Target) -> DirectoryStoreResult<()>;

    /// Removes a target and its parent edge, returning it when it existed.
    async fn remove_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>>;

    /// Finds a target by identifier.
    async fn find_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>>;

    /// Returns the direct children of `parent` in insertion order.
    async fn list_children(&self, parent: TargetId) -> DirectoryStoreResult<Vec<Target>>;

    /// Returns the identities owned by `belong_id`.
    async fn list_identities(&self, belong_id: TargetId) -> DirectoryStoreResult<Vec<Identity>>;

    /// Finds an identity by identifier.
    async fn find_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>>;

    /// Stores a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::DuplicateIdentity`] when the ID exists.
    async fn insert_identity(&self, identity: &Identity) -> DirectoryStoreResult<()>;

    /// Removes an identity, returning it when it existed.
    async fn remove_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>>;

    /// Removes every identity owned by `belong_id`, returning how many went.
    async fn remove_identities_of(&self, belong_id: TargetId) -> DirectoryStoreResult<usize>;

    /// Adds `ids` of variant `member_type` as members of `team`.
    async fn add_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool>;

    /// Removes `ids` of variant `member_type` from the members of `team`.
    async fn remove_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool>;

    /// Returns a page of the members of `team`.
    async fn list_members(
        &self,
        team: TargetId,
        page: &PageRequest,
    ) -> DirectoryStoreResult<Page<Target>>;

    /// Loads the raw authority tree of `space`, if one was defined.
    async fn load_authority_tree(&self, space: TargetId)
    -> DirectoryStoreResult<Option<AuthorityNode>>;

    /// Returns the flow definitions owned by `space`.
    async fn list_defines(&self, space: TargetId) -> DirectoryStoreResult<Vec<FlowDefine>>;

    /// Inserts or replaces a flow definition.
    async fn upsert_define(&self, define: &FlowDefine) -> DirectoryStoreResult<()>;

    /// Removes a flow definition, returning it when it existed.
    async fn remove_define(&self, id: DefineId) -> DirectoryStoreResult<Option<FlowDefine>>;

    /// Returns the markets `target` has joined.
    async fn joined_markets(&self, target: TargetId) -> DirectoryStoreResult<Vec<MarketId>>;

    /// Records that `target` joined `market`; `false` if already a member.
    async fn join_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool>;

    /// Records that `target` quit `market`; `false` if it was not a member.
    async fn quit_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool>;
}

/// Errors returned by directory store implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryStoreError {
    /// A target with the same identifier already exists.
    #[error("duplicate target identifier: {0}")]
    DuplicateTarget(TargetId),

    /// An identity with the same identifier already exists.
    #[error("duplicate identity identifier: {0}")]
    DuplicateIdentity(IdentityId),

    /// The target was not found.
    #[error("target not found: {0}")]
    TargetNotFound(TargetId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
