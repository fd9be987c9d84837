//! In-memory directory store for tests and embedded use.

use crate::target::{
    domain::{
        AuthorityNode, DefineId, FlowDefine, Identity, IdentityId, MarketId, Target, TargetId,
        TargetType,
    },
    ports::{DirectoryStore, DirectoryStoreError, DirectoryStoreResult, Page, PageRequest},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory directory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    targets: HashMap<TargetId, Target>,
    parents: HashMap<TargetId, TargetId>,
    children: HashMap<TargetId, Vec<TargetId>>,
    identities: HashMap<IdentityId, Identity>,
    identity_order: Vec<IdentityId>,
    members: HashMap<TargetId, Vec<TargetId>>,
    authority_trees: HashMap<TargetId, AuthorityNode>,
    defines: HashMap<DefineId, FlowDefine>,
    define_order: Vec<DefineId>,
    markets: HashMap<TargetId, Vec<MarketId>>,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the raw authority tree for `space`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::Persistence`] when the lock is poisoned.
    pub fn set_authority_tree(
        &self,
        space: TargetId,
        tree: AuthorityNode,
    ) -> DirectoryStoreResult<()> {
        self.write()?.authority_trees.insert(space, tree);
        Ok(())
    }

    fn read(&self) -> DirectoryStoreResult<RwLockReadGuard<'_, InMemoryDirectoryState>> {
        self.state
            .read()
            .map_err(|err| DirectoryStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> DirectoryStoreResult<RwLockWriteGuard<'_, InMemoryDirectoryState>> {
        self.state
            .write()
            .map_err(|err| DirectoryStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

/// Returns `true` when every id names a stored target of `member_type`.
fn all_of_type(state: &InMemoryDirectoryState, ids: &[TargetId], member_type: TargetType) -> bool {
    ids.iter().all(|id| {
        state
            .targets
            .get(id)
            .is_some_and(|target| target.type_name() == member_type)
    })
}

fn matches_filter(target: &Target, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    target.name().to_lowercase().contains(&needle)
        || target.profile().code().to_lowercase().contains(&needle)
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn insert_target(
        &self,
        target: &Target,
        parent: Option<TargetId>,
    ) -> DirectoryStoreResult<()> {
        let mut state = self.write()?;
        if state.targets.contains_key(&target.id()) {
            return Err(DirectoryStoreError::DuplicateTarget(target.id()));
        }
        if let Some(parent_id) = parent {
            if !state.targets.contains_key(&parent_id) {
                return Err(DirectoryStoreError::TargetNotFound(parent_id));
            }
            state.parents.insert(target.id(), parent_id);
            state.children.entry(parent_id).or_default().push(target.id());
        }
        state.targets.insert(target.id(), target.clone());
        Ok(())
    }

    async fn update_target(&self, target: &Target) -> DirectoryStoreResult<()> {
        let mut state = self.write()?;
        let stored = state
            .targets
            .get_mut(&target.id())
            .ok_or(DirectoryStoreError::TargetNotFound(target.id()))?;
        *stored = target.clone();
        Ok(())
    }

    async fn remove_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>> {
        let mut state = self.write()?;
        let Some(removed) = state.targets.remove(&id) else {
            return Ok(None);
        };
        if let Some(parent_id) = state.parents.remove(&id)
            && let Some(siblings) = state.children.get_mut(&parent_id)
        {
            siblings.retain(|child| *child != id);
        }
        state.children.remove(&id);
        state.members.remove(&id);
        state.markets.remove(&id);
        for members in state.members.values_mut() {
            members.retain(|member| *member != id);
        }
        Ok(Some(removed))
    }

    async fn find_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>> {
        Ok(self.read()?.targets.get(&id).cloned())
    }

    async fn list_children(&self, parent: TargetId) -> DirectoryStoreResult<Vec<Target>> {
        let state = self.read()?;
        let children: Vec<Target> = state
            .children
            .get(&parent)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.targets.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(children)
    }

    async fn list_identities(&self, belong_id: TargetId) -> DirectoryStoreResult<Vec<Identity>> {
        let state = self.read()?;
        Ok(state
            .identity_order
            .iter()
            .filter_map(|id| state.identities.get(id))
            .filter(|identity| identity.is_owned_by(belong_id))
            .cloned()
            .collect())
    }

    async fn find_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>> {
        Ok(self.read()?.identities.get(&id).cloned())
    }

    async fn insert_identity(&self, identity: &Identity) -> DirectoryStoreResult<()> {
        let mut state = self.write()?;
        if state.identities.contains_key(&identity.id()) {
            return Err(DirectoryStoreError::DuplicateIdentity(identity.id()));
        }
        state.identity_order.push(identity.id());
        state.identities.insert(identity.id(), identity.clone());
        Ok(())
    }

    async fn remove_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>> {
        let mut state = self.write()?;
        let removed = state.identities.remove(&id);
        if removed.is_some() {
            state.identity_order.retain(|existing| *existing != id);
        }
        Ok(removed)
    }

    async fn remove_identities_of(&self, belong_id: TargetId) -> DirectoryStoreResult<usize> {
        let mut state = self.write()?;
        let before = state.identities.len();
        state
            .identities
            .retain(|_, identity| !identity.is_owned_by(belong_id));
        let InMemoryDirectoryState {
            identities,
            identity_order,
            ..
        } = &mut *state;
        identity_order.retain(|id| identities.contains_key(id));
        Ok(before - state.identities.len())
    }

    async fn add_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool> {
        let mut state = self.write()?;
        let Some(team_type) = state.targets.get(&team).map(Target::type_name) else {
            return Ok(false);
        };
        if !all_of_type(&state, ids, member_type) {
            return Ok(false);
        }
        let members = state.members.entry(team).or_default();
        let mut added = Vec::new();
        for id in ids {
            if !members.contains(id) {
                members.push(*id);
                added.push(*id);
            }
        }
        if team_type == TargetType::Company && member_type == TargetType::Person {
            for id in added {
                if let Some(person) = state.targets.get_mut(&id) {
                    person.record_joined_company(team);
                }
            }
        }
        Ok(true)
    }

    async fn remove_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool> {
        let mut state = self.write()?;
        if !all_of_type(&state, ids, member_type) {
            return Ok(false);
        }
        let Some(members) = state.members.get_mut(&team) else {
            return Ok(false);
        };
        if !ids.iter().all(|id| members.contains(id)) {
            return Ok(false);
        }
        members.retain(|member| !ids.contains(member));
        Ok(true)
    }

    async fn list_members(
        &self,
        team: TargetId,
        page: &PageRequest,
    ) -> DirectoryStoreResult<Page<Target>> {
        let state = self.read()?;
        let matching: Vec<Target> = state
            .members
            .get(&team)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.targets.get(id))
                    .filter(|target| matches_filter(target, &page.filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();
        Ok(Page {
            items,
            total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    async fn load_authority_tree(
        &self,
        space: TargetId,
    ) -> DirectoryStoreResult<Option<AuthorityNode>> {
        Ok(self.read()?.authority_trees.get(&space).cloned())
    }

    async fn list_defines(&self, space: TargetId) -> DirectoryStoreResult<Vec<FlowDefine>> {
        let state = self.read()?;
        Ok(state
            .define_order
            .iter()
            .filter_map(|id| state.defines.get(id))
            .filter(|define| define.belong_id() == space)
            .cloned()
            .collect())
    }

    async fn upsert_define(&self, define: &FlowDefine) -> DirectoryStoreResult<()> {
        let mut state = self.write()?;
        if state.defines.insert(define.id(), define.clone()).is_none() {
            state.define_order.push(define.id());
        }
        Ok(())
    }

    async fn remove_define(&self, id: DefineId) -> DirectoryStoreResult<Option<FlowDefine>> {
        let mut state = self.write()?;
        let removed = state.defines.remove(&id);
        if removed.is_some() {
            state.define_order.retain(|existing| *existing != id);
        }
        Ok(removed)
    }

    async fn joined_markets(&self, target: TargetId) -> DirectoryStoreResult<Vec<MarketId>> {
        Ok(self
            .read()?
            .markets
            .get(&target)
            .cloned()
            .unwrap_or_default())
    }

    async fn join_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool> {
        let mut state = self.write()?;
        let joined = state.markets.entry(target).or_default();
        if joined.contains(&market) {
            return Ok(false);
        }
        joined.push(market);
        Ok(true)
    }

    async fn quit_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool> {
        let mut state = self.write()?;
        let Some(joined) = state.markets.get_mut(&target) else {
            return Ok(false);
        };
        let before = joined.len();
        joined.retain(|existing| *existing != market);
        Ok(joined.len() != before)
    }
}
