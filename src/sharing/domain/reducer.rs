//! Pure state transitions for a share session.

use super::{CandidateNode, DestinationType, ShareNode, WorkingSet};
use crate::target::domain::TargetId;
use uuid::Uuid;

/// Complete state of a share session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareState {
    destination: DestinationType,
    selected_team: Option<TargetId>,
    sets: WorkingSets,
    candidates: Vec<CandidateNode>,
}

impl ShareState {
    /// Creates an empty state showing `destination`.
    #[must_use]
    pub fn new(destination: DestinationType) -> Self {
        Self {
            destination,
            selected_team: None,
            sets: WorkingSets::default(),
            candidates: Vec::new(),
        }
    }

    /// Returns the active destination type.
    #[must_use]
    pub const fn destination(&self) -> DestinationType {
        self.destination
    }

    /// Returns the team selected on the left panel.
    #[must_use]
    pub const fn selected_team(&self) -> Option<TargetId> {
        self.selected_team
    }

    /// Returns the working set of `destination`.
    #[must_use]
    pub const fn working_set(&self, destination: DestinationType) -> &WorkingSet {
        self.sets.get(destination)
    }

    /// Returns the working set of the active destination.
    #[must_use]
    pub const fn active_set(&self) -> &WorkingSet {
        self.working_set(self.destination)
    }

    /// Returns the center-panel candidates.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateNode] {
        &self.candidates
    }

    /// Finds a candidate anywhere in the candidate forest.
    #[must_use]
    pub fn find_candidate(&self, id: Uuid) -> Option<&CandidateNode> {
        self.candidates.iter().find_map(|root| root.find(id))
    }

    const fn active_set_mut(&mut self) -> &mut WorkingSet {
        self.sets.get_mut(self.destination)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct WorkingSets {
    organization: WorkingSet,
    role: WorkingSet,
    station: WorkingSet,
    person: WorkingSet,
}

impl WorkingSets {
    const fn get(&self, destination: DestinationType) -> &WorkingSet {
        match destination {
            DestinationType::Organization => &self.organization,
            DestinationType::Role => &self.role,
            DestinationType::Station => &self.station,
            DestinationType::Person => &self.person,
        }
    }

    const fn get_mut(&mut self, destination: DestinationType) -> &mut WorkingSet {
        match destination {
            DestinationType::Organization => &mut self.organization,
            DestinationType::Role => &mut self.role,
            DestinationType::Station => &mut self.station,
            DestinationType::Person => &mut self.person,
        }
    }
}

/// Events a share session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// A node was checked in the active destination.
    Check(ShareNode),
    /// A node was unchecked in the active destination.
    Uncheck(ShareNode),
    /// The destination type changed; every set and the selection reset.
    SwitchDestination(DestinationType),
    /// A team was picked on the left panel; sets and candidates reset.
    SelectTeam(TargetId),
    /// The persisted baseline of a destination arrived.
    LoadBaseline {
        /// Destination the baseline belongs to.
        destination: DestinationType,
        /// Nodes currently holding the share.
        nodes: Vec<ShareNode>,
    },
    /// Center-panel candidates arrived.
    ShowCandidates(Vec<CandidateNode>),
}

/// Applies `action` to `state`.
#[must_use]
pub fn reduce(mut state: ShareState, action: ShareAction) -> ShareState {
    match action {
        ShareAction::Check(node) => state.active_set_mut().check(node),
        ShareAction::Uncheck(node) => state.active_set_mut().uncheck(&node),
        ShareAction::SwitchDestination(destination) => return ShareState::new(destination),
        ShareAction::SelectTeam(team) => {
            state.selected_team = Some(team);
            state.sets = WorkingSets::default();
            state.candidates.clear();
        }
        ShareAction::LoadBaseline { destination, nodes } => {
            *state.sets.get_mut(destination) = WorkingSet::from_baseline(nodes);
        }
        ShareAction::ShowCandidates(candidates) => state.candidates = candidates,
    }
    state
}
