//! Hierarchy orchestration: resolving targets, nesting teams, identities,
//! membership, authority trees and space-level bindings.

use crate::config::OrgworkConfig;
use crate::target::{
    domain::{
        AuthorityNode, Capability, CommandOutcome, DefineId, FlowDefine, HierarchyDomainError,
        Identity, IdentityId, IdentityParams, MarketId, PublishDefineParams, Target, TargetId,
        TargetProfile, TargetType,
    },
    ports::{DirectoryStore, DirectoryStoreError, Page, PageRequest},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Service-level errors for hierarchy operations.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] HierarchyDomainError),
    /// Directory store operation failed.
    #[error(transparent)]
    Store(#[from] DirectoryStoreError),
    /// The addressed target does not exist.
    #[error("target not found: {0}")]
    TargetNotFound(TargetId),
}

/// Result type for hierarchy service operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

#[derive(Debug, Default)]
struct HierarchyCache {
    sub_teams: HashMap<TargetId, Vec<Target>>,
    authority: HashMap<TargetId, Option<AuthorityNode>>,
    defines: HashMap<TargetId, Vec<FlowDefine>>,
}

/// Organization hierarchy service.
///
/// Children, authority trees and flow definitions are cached per target and
/// refreshed when the caller passes `reload = true`.
pub struct HierarchyService<D, C>
where
    D: DirectoryStore,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    clock: Arc<C>,
    config: OrgworkConfig,
    cache: RwLock<HierarchyCache>,
}

impl<D, C> HierarchyService<D, C>
where
    D: DirectoryStore,
    C: Clock + Send + Sync,
{
    /// Creates a hierarchy service with default configuration.
    #[must_use]
    pub fn new(directory: Arc<D>, clock: Arc<C>) -> Self {
        Self::with_config(directory, clock, OrgworkConfig::default())
    }

    /// Creates a hierarchy service with explicit configuration.
    #[must_use]
    pub fn with_config(directory: Arc<D>, clock: Arc<C>, config: OrgworkConfig) -> Self {
        Self {
            directory,
            clock,
            config,
            cache: RwLock::new(HierarchyCache::default()),
        }
    }

    /// Resolves a target by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::TargetNotFound`] when the target is absent or
    /// [`HierarchyError::Store`] when the lookup fails.
    pub async fn resolve(&self, id: TargetId) -> HierarchyResult<Target> {
        self.directory
            .find_target(id)
            .await?
            .ok_or(HierarchyError::TargetNotFound(id))
    }

    /// Registers a person as a root of the directory.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Store`] when persistence fails.
    pub async fn register_person(&self, profile: TargetProfile) -> HierarchyResult<Target> {
        let person = Target::new_space(TargetType::Person, profile, &*self.clock)?;
        self.directory.insert_target(&person, None).await?;
        info!(target_id = %person.id(), name = person.name(), "registered person");
        Ok(person)
    }

    /// Creates a company operated by `person`.
    ///
    /// Companies are directory roots; the founding person is recorded as the
    /// operator and pulled in as the first member.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Domain`] when `person` is not a person, or a
    /// lookup/persistence error.
    pub async fn create_company(
        &self,
        person: TargetId,
        profile: TargetProfile,
    ) -> HierarchyResult<Target> {
        let founder = self.resolve(person).await?;
        if founder.type_name() != TargetType::Person {
            return Err(HierarchyDomainError::FounderNotPerson(founder.type_name()).into());
        }
        let mut company = Target::new_space(TargetType::Company, profile, &*self.clock)?;
        let company_id = company.id();
        company.assign_operator(founder.id());
        self.directory.insert_target(&company, None).await?;
        self.directory
            .add_members(company_id, &[founder.id()], TargetType::Person)
            .await?;
        info!(target_id = %company_id, founder = %founder.id(), "created company");
        Ok(company)
    }

    /// Creates a child team of `child_type` beneath `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Domain`] when the parent cannot hold children
    /// of that variant, or a lookup/persistence error.
    pub async fn create_sub_team(
        &self,
        parent: TargetId,
        child_type: TargetType,
        profile: TargetProfile,
    ) -> HierarchyResult<Target> {
        let parent_target = self.resolve(parent).await?;
        parent_target.require(Capability::SubTeams)?;
        let child = parent_target.spawn_child(child_type, profile, &*self.clock)?;
        self.directory.insert_target(&child, Some(parent)).await?;

        let mut cache = self.cache.write().await;
        if let Some(children) = cache.sub_teams.get_mut(&parent) {
            children.push(child.clone());
        }
        info!(
            parent = %parent,
            child = %child.id(),
            child_type = %child_type,
            "created sub team"
        );
        Ok(child)
    }

    /// Replaces a target's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns a lookup or persistence error.
    pub async fn update(&self, id: TargetId, profile: TargetProfile) -> HierarchyResult<Target> {
        let mut target = self.resolve(id).await?;
        target.update_profile(profile, &*self.clock);
        self.directory.update_target(&target).await?;

        let mut cache = self.cache.write().await;
        for children in cache.sub_teams.values_mut() {
            if let Some(stale) = children.iter_mut().find(|child| child.id() == id) {
                *stale = target.clone();
            }
        }
        debug!(target_id = %id, "updated target");
        Ok(target)
    }

    /// Deletes the child `child` of `parent`, cascading to every descendant
    /// and to the identities each of them owns.
    ///
    /// Returns [`CommandOutcome::NotFound`] when no such target exists and
    /// [`CommandOutcome::Denied`] when it exists under a different parent.
    ///
    /// # Errors
    ///
    /// Returns a lookup or persistence error for the parent or the store.
    /// A cascade that fails part way still evicts the parent's cached
    /// children and every target it managed to remove.
    pub async fn delete_sub_team(
        &self,
        parent: TargetId,
        child: TargetId,
    ) -> HierarchyResult<CommandOutcome> {
        self.resolve(parent).await?;
        let children = self.directory.list_children(parent).await?;
        if !children.iter().any(|candidate| candidate.id() == child) {
            let exists = self.directory.find_target(child).await?.is_some();
            let outcome = if exists {
                CommandOutcome::Denied
            } else {
                CommandOutcome::NotFound
            };
            debug!(parent = %parent, child = %child, ?outcome, "sub team delete refused");
            return Ok(outcome);
        }

        let mut removed = Vec::new();
        let cascade = self.remove_subtree(child, &mut removed).await;

        let mut cache = self.cache.write().await;
        cache.sub_teams.remove(&parent);
        for id in &removed {
            cache.sub_teams.remove(id);
            cache.authority.remove(id);
            cache.defines.remove(id);
        }
        drop(cache);
        if let Err(err) = cascade {
            warn!(
                parent = %parent,
                child = %child,
                removed = removed.len(),
                error = %err,
                "sub team cascade stopped part way"
            );
            return Err(err);
        }
        info!(parent = %parent, child = %child, removed = removed.len(), "deleted sub team");
        Ok(CommandOutcome::Applied)
    }

    async fn remove_subtree(
        &self,
        root: TargetId,
        removed: &mut Vec<TargetId>,
    ) -> HierarchyResult<()> {
        let mut pending = vec![root];
        while let Some(next) = pending.pop() {
            pending.extend(
                self.directory
                    .list_children(next)
                    .await?
                    .iter()
                    .map(Target::id),
            );
            self.directory.remove_identities_of(next).await?;
            self.directory.remove_target(next).await?;
            removed.push(next);
        }
        Ok(())
    }

    /// Returns the children of `id`, served from cache unless `reload`.
    ///
    /// Only variants listed in the target's `sub_team_types` are returned.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Domain`] when the variant has no sub teams,
    /// or a lookup error.
    pub async fn load_sub_team(&self, id: TargetId, reload: bool) -> HierarchyResult<Vec<Target>> {
        if !reload && let Some(cached) = self.cache.read().await.sub_teams.get(&id) {
            return Ok(cached.clone());
        }
        let target = self.resolve(id).await?;
        target.require(Capability::SubTeams)?;
        let allowed = target.sub_team_types();
        let children: Vec<Target> = self
            .directory
            .list_children(id)
            .await?
            .into_iter()
            .filter(|child| {
                let keep = allowed.contains(&child.type_name());
                if !keep {
                    warn!(
                        parent = %id,
                        child = %child.id(),
                        "skipping child outside sub team types"
                    );
                }
                keep
            })
            .collect();
        self.cache
            .write()
            .await
            .sub_teams
            .insert(id, children.clone());
        Ok(children)
    }

    /// Returns the identities owned by `id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn get_identities(&self, id: TargetId) -> HierarchyResult<Vec<Identity>> {
        let target = self.resolve(id).await?;
        target.require(Capability::Identities)?;
        Ok(self.directory.list_identities(id).await?)
    }

    /// Creates an identity owned by `id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn create_identity(
        &self,
        id: TargetId,
        params: IdentityParams,
    ) -> HierarchyResult<Identity> {
        let target = self.resolve(id).await?;
        target.require(Capability::Identities)?;
        let identity = Identity::new(id, params);
        self.directory.insert_identity(&identity).await?;
        debug!(target_id = %id, identity = %identity.id(), "created identity");
        Ok(identity)
    }

    /// Deletes an identity owned by `id`.
    ///
    /// Never fails for a miss: an absent identity yields
    /// [`CommandOutcome::NotFound`] and one owned elsewhere yields
    /// [`CommandOutcome::Denied`].
    ///
    /// # Errors
    ///
    /// Returns a store error when the lookup or delete fails.
    pub async fn delete_identity(
        &self,
        id: TargetId,
        identity: IdentityId,
    ) -> HierarchyResult<CommandOutcome> {
        let Some(found) = self.directory.find_identity(identity).await? else {
            return Ok(CommandOutcome::NotFound);
        };
        if !found.is_owned_by(id) {
            return Ok(CommandOutcome::Denied);
        }
        let removed = self.directory.remove_identity(identity).await?;
        Ok(CommandOutcome::from(removed.is_some()))
    }

    /// Returns `true` when `id` owns `identity`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the lookup fails.
    pub async fn judge_has_identity(
        &self,
        id: TargetId,
        identity: IdentityId,
    ) -> HierarchyResult<bool> {
        Ok(self
            .directory
            .find_identity(identity)
            .await?
            .is_some_and(|found| found.is_owned_by(id)))
    }

    /// Returns a page of the members of `id`, with the limit capped by
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a lookup or store error.
    pub async fn load_members(
        &self,
        id: TargetId,
        page: PageRequest,
    ) -> HierarchyResult<Page<Target>> {
        self.resolve(id).await?;
        let capped = PageRequest {
            limit: page.limit.min(self.config.member_page_limit),
            ..page
        };
        Ok(self.directory.list_members(id, &capped).await?)
    }

    /// Pulls a single member into `id`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the command cannot be sent.
    pub async fn pull_member(&self, id: TargetId, member: &Target) -> HierarchyResult<bool> {
        self.pull_members(id, &[member.id()], member.type_name())
            .await
    }

    /// Pulls a batch of members of `member_type` into `id`.
    ///
    /// The batch succeeds or fails as a whole; an empty batch is a no-op that
    /// reports `false`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the command cannot be sent.
    pub async fn pull_members(
        &self,
        id: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> HierarchyResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }
        let applied = self.directory.add_members(id, ids, member_type).await?;
        info!(team = %id, count = ids.len(), %member_type, applied, "pull members");
        Ok(applied)
    }

    /// Removes a single member from `id`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the command cannot be sent.
    pub async fn remove_member(&self, id: TargetId, member: &Target) -> HierarchyResult<bool> {
        self.remove_members(id, &[member.id()], member.type_name())
            .await
    }

    /// Removes a batch of members of `member_type` from `id`.
    ///
    /// # Errors
    ///
    /// Returns a store error when the command cannot be sent.
    pub async fn remove_members(
        &self,
        id: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> HierarchyResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }
        let applied = self.directory.remove_members(id, ids, member_type).await?;
        info!(team = %id, count = ids.len(), %member_type, applied, "remove members");
        Ok(applied)
    }

    /// Returns the authority tree of `id`'s space, annotated relative to the
    /// target's own `belong_id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn select_authority_tree(
        &self,
        id: TargetId,
        reload: bool,
    ) -> HierarchyResult<Option<AuthorityNode>> {
        if !reload && let Some(cached) = self.cache.read().await.authority.get(&id) {
            return Ok(cached.clone());
        }
        let target = self.resolve(id).await?;
        let tree = self
            .authority_tree_relative_to(&target, target.belong_id())
            .await?;
        self.cache.write().await.authority.insert(id, tree.clone());
        Ok(tree)
    }

    /// Returns the authority tree of `id`'s space annotated relative to an
    /// arbitrary entity, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn authority_tree_for(
        &self,
        id: TargetId,
        relative_to: TargetId,
    ) -> HierarchyResult<Option<AuthorityNode>> {
        let target = self.resolve(id).await?;
        self.authority_tree_relative_to(&target, relative_to).await
    }

    async fn authority_tree_relative_to(
        &self,
        target: &Target,
        relative_to: TargetId,
    ) -> HierarchyResult<Option<AuthorityNode>> {
        target.require(Capability::AuthorityTree)?;
        let raw = self.directory.load_authority_tree(target.space_id()).await?;
        Ok(raw.map(|tree| tree.annotated(relative_to)))
    }

    /// Returns the flow definitions bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn get_defines(
        &self,
        id: TargetId,
        reload: bool,
    ) -> HierarchyResult<Vec<FlowDefine>> {
        if !reload && let Some(cached) = self.cache.read().await.defines.get(&id) {
            return Ok(cached.clone());
        }
        let target = self.resolve(id).await?;
        target.require(Capability::FlowDefinitions)?;
        let defines = self.directory.list_defines(id).await?;
        self.cache.write().await.defines.insert(id, defines.clone());
        Ok(defines)
    }

    /// Publishes a new flow definition owned by `id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn publish_define(
        &self,
        id: TargetId,
        params: PublishDefineParams,
    ) -> HierarchyResult<FlowDefine> {
        let target = self.resolve(id).await?;
        target.require(Capability::FlowDefinitions)?;
        let define = FlowDefine::new(id, params);
        self.directory.upsert_define(&define).await?;
        if let Some(cached) = self.cache.write().await.defines.get_mut(&id) {
            cached.push(define.clone());
        }
        info!(target_id = %id, define = %define.id(), "published flow definition");
        Ok(define)
    }

    /// Deletes a flow definition owned by `id`.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn delete_define(
        &self,
        id: TargetId,
        define: DefineId,
    ) -> HierarchyResult<CommandOutcome> {
        let target = self.resolve(id).await?;
        target.require(Capability::FlowDefinitions)?;
        let owned = self
            .directory
            .list_defines(id)
            .await?
            .iter()
            .any(|candidate| candidate.id() == define);
        if !owned {
            return Ok(CommandOutcome::NotFound);
        }
        self.directory.remove_define(define).await?;
        if let Some(cached) = self.cache.write().await.defines.get_mut(&id) {
            cached.retain(|candidate| candidate.id() != define);
        }
        Ok(CommandOutcome::Applied)
    }

    /// Returns the markets `id` has joined.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn joined_markets(&self, id: TargetId) -> HierarchyResult<Vec<MarketId>> {
        let target = self.resolve(id).await?;
        target.require(Capability::MarketMembership)?;
        Ok(self.directory.joined_markets(id).await?)
    }

    /// Joins `market`; `false` when already a member.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn apply_join_market(&self, id: TargetId, market: MarketId) -> HierarchyResult<bool> {
        let target = self.resolve(id).await?;
        target.require(Capability::MarketMembership)?;
        Ok(self.directory.join_market(id, market).await?)
    }

    /// Quits `market`; `false` when not a member.
    ///
    /// # Errors
    ///
    /// Returns a capability, lookup or store error.
    pub async fn quit_market(&self, id: TargetId, market: MarketId) -> HierarchyResult<bool> {
        let target = self.resolve(id).await?;
        target.require(Capability::MarketMembership)?;
        Ok(self.directory.quit_market(id, market).await?)
    }
}
