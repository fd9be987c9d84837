//! Share session: candidate loading, checked-set reconciliation and commit.

use crate::sharing::{
    domain::{
        CandidateNode, DestinationType, ShareAction, ShareDiff, ShareNode, ShareState,
        ShareSummary, reduce,
    },
    ports::{ShareStore, ShareStoreError},
};
use crate::target::{
    domain::{Target, TargetId},
    ports::{DirectoryStore, PageRequest},
    services::{HierarchyError, HierarchyService},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Service-level errors for share sessions.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Hierarchy lookup failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    /// Share store operation failed.
    #[error(transparent)]
    Store(#[from] ShareStoreError),
    /// The destination picks nodes from the team tree, not from a team.
    #[error("destination {0} has no team candidates")]
    NoCandidates(DestinationType),
    /// A commit needs a selected team for this destination.
    #[error("destination {0} requires a selected team")]
    NoTeamSelected(DestinationType),
    /// The node is not among the current candidates.
    #[error("node {0} is not a candidate")]
    UnknownCandidate(Uuid),
    /// The candidate is disabled.
    #[error("candidate {0} is disabled")]
    DisabledCandidate(Uuid),
}

/// Result type for share session operations.
pub type ShareResult<T> = Result<T, ShareError>;

/// One share editing session on behalf of `owner`.
///
/// Organization shares are keyed by the owner; every other destination is
/// keyed by the selected team.
pub struct ShareSession<D, C, S>
where
    D: DirectoryStore,
    C: Clock + Send + Sync,
    S: ShareStore,
{
    hierarchy: Arc<HierarchyService<D, C>>,
    store: Arc<S>,
    owner: TargetId,
    state: Mutex<ShareState>,
}

impl<D, C, S> ShareSession<D, C, S>
where
    D: DirectoryStore,
    C: Clock + Send + Sync,
    S: ShareStore,
{
    /// Opens a session for `owner` showing `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Hierarchy`] when the owner does not resolve and
    /// [`ShareError::Store`] when the baseline cannot be loaded.
    pub async fn open(
        hierarchy: Arc<HierarchyService<D, C>>,
        store: Arc<S>,
        owner: TargetId,
        destination: DestinationType,
    ) -> ShareResult<Self> {
        hierarchy.resolve(owner).await?;
        let session = Self {
            hierarchy,
            store,
            owner,
            state: Mutex::new(ShareState::new(destination)),
        };
        session.switch_destination(destination).await?;
        Ok(session)
    }

    /// Returns the owner the session edits shares for.
    #[must_use]
    pub const fn owner(&self) -> TargetId {
        self.owner
    }

    /// Returns a snapshot of the session state.
    pub async fn state(&self) -> ShareState {
        self.state.lock().await.clone()
    }

    /// Switches the destination type, discarding every working set.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Store`] when the organization baseline cannot
    /// be loaded.
    pub async fn switch_destination(
        &self,
        destination: DestinationType,
    ) -> ShareResult<ShareState> {
        self.dispatch(ShareAction::SwitchDestination(destination))
            .await;
        if !destination.uses_candidates() {
            self.load_baseline(self.owner, destination).await?;
        }
        debug!(owner = %self.owner, %destination, "switched share destination");
        Ok(self.state().await)
    }

    /// Selects `team` and loads its candidates and baseline.
    ///
    /// Role candidates come from the owner's authority tree, enabled where
    /// a node belongs to `team`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::NoCandidates`] for the organization destination,
    /// hierarchy errors (including unsupported capabilities) and store
    /// failures.
    pub async fn select_team(&self, team: TargetId) -> ShareResult<ShareState> {
        let destination = self.state.lock().await.destination();
        if !destination.uses_candidates() {
            return Err(ShareError::NoCandidates(destination));
        }
        let target = self.hierarchy.resolve(team).await?;
        let candidates = self.candidates_for(&target, destination).await?;
        self.dispatch(ShareAction::SelectTeam(team)).await;
        self.dispatch(ShareAction::ShowCandidates(candidates)).await;
        self.load_baseline(team, destination).await?;
        info!(owner = %self.owner, team = %team, %destination, "selected share team");
        Ok(self.state().await)
    }

    async fn candidates_for(
        &self,
        team: &Target,
        destination: DestinationType,
    ) -> ShareResult<Vec<CandidateNode>> {
        let candidates: Vec<CandidateNode> = match destination {
            DestinationType::Role => self
                .hierarchy
                .authority_tree_for(self.owner, team.id())
                .await?
                .as_ref()
                .map(CandidateNode::from)
                .into_iter()
                .collect(),
            DestinationType::Station => self
                .hierarchy
                .get_identities(team.id())
                .await?
                .iter()
                .map(CandidateNode::from)
                .collect(),
            DestinationType::Person => self
                .hierarchy
                .load_members(team.id(), PageRequest::new(0, usize::MAX))
                .await?
                .items
                .iter()
                .map(CandidateNode::from)
                .collect(),
            DestinationType::Organization => Vec::new(),
        };
        Ok(candidates)
    }

    /// Checks `node` in the active destination.
    ///
    /// # Errors
    ///
    /// For candidate-backed destinations, returns
    /// [`ShareError::UnknownCandidate`] when `node` is not a candidate and
    /// [`ShareError::DisabledCandidate`] when it is disabled.
    pub async fn check(&self, node: ShareNode) -> ShareResult<ShareState> {
        let mut state = self.state.lock().await;
        if state.destination().uses_candidates() {
            let candidate = state
                .find_candidate(node.id)
                .ok_or(ShareError::UnknownCandidate(node.id))?;
            if candidate.disabled {
                return Err(ShareError::DisabledCandidate(node.id));
            }
        }
        Ok(apply(&mut state, ShareAction::Check(node)))
    }

    /// Unchecks `node` in the active destination.
    pub async fn uncheck(&self, node: ShareNode) -> ShareState {
        self.dispatch(ShareAction::Uncheck(node)).await
    }

    /// Returns the summary of the active destination.
    pub async fn summary(&self) -> ShareSummary {
        self.state.lock().await.active_set().summary()
    }

    /// Commits the active working set and reloads its baseline.
    ///
    /// An empty diff is not sent to the store.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::NoTeamSelected`] when a candidate-backed
    /// destination has no team, and store failures.
    pub async fn commit(&self) -> ShareResult<ShareDiff> {
        let state = self.state().await;
        let destination = state.destination();
        let team = if destination.uses_candidates() {
            state
                .selected_team()
                .ok_or(ShareError::NoTeamSelected(destination))?
        } else {
            self.owner
        };
        let diff = state.active_set().diff();
        if diff.is_empty() {
            debug!(team = %team, %destination, "nothing to commit");
            return Ok(diff);
        }
        self.store.commit(team, destination, &diff).await?;
        info!(
            team = %team,
            %destination,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "committed share"
        );
        self.load_baseline(team, destination).await?;
        Ok(diff)
    }

    async fn load_baseline(
        &self,
        team: TargetId,
        destination: DestinationType,
    ) -> ShareResult<()> {
        let nodes = self.store.load_baseline(team, destination).await?;
        self.dispatch(ShareAction::LoadBaseline { destination, nodes })
            .await;
        Ok(())
    }

    async fn dispatch(&self, action: ShareAction) -> ShareState {
        let mut state = self.state.lock().await;
        apply(&mut state, action)
    }
}

fn apply(state: &mut ShareState, action: ShareAction) -> ShareState {
    let placeholder = ShareState::new(state.destination());
    let current = std::mem::replace(state, placeholder);
    *state = reduce(current, action);
    state.clone()
}
