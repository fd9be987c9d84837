//! Checked-set reconciliation against a persisted baseline.

use super::ShareNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// How a checked node relates to the baseline.
///
/// A node missing from the working set is absent: never checked, or checked
/// and unchecked again without being in the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// Newly checked; not in the baseline.
    Add,
    /// In the baseline and still checked.
    Has,
    /// In the baseline and unchecked.
    Del,
}

/// A node together with its membership state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEntry {
    /// The checked node.
    pub node: ShareNode,
    /// Its state relative to the baseline.
    pub state: MembershipState,
}

/// Changes a working set implies for the persisted share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareDiff {
    /// Nodes to add.
    pub added: Vec<ShareNode>,
    /// Baseline nodes to remove.
    pub removed: Vec<ShareNode>,
}

impl ShareDiff {
    /// Returns `true` when nothing changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Right-hand panel summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSummary {
    /// Nodes that will hold the share after commit.
    pub count: usize,
    /// Every tracked entry, including soft-deleted ones.
    pub entries: Vec<ShareEntry>,
}

/// Working set of one destination type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    baseline: HashSet<Uuid>,
    entries: Vec<ShareEntry>,
}

impl WorkingSet {
    /// Creates an empty working set with no baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a working set whose baseline nodes are all `has`.
    #[must_use]
    pub fn from_baseline(nodes: impl IntoIterator<Item = ShareNode>) -> Self {
        let mut set = Self::new();
        for node in nodes {
            if set.baseline.insert(node.id) {
                set.entries.push(ShareEntry {
                    node,
                    state: MembershipState::Has,
                });
            }
        }
        set
    }

    /// Checks `node`.
    ///
    /// Baseline nodes become `has`, others `add`. Checking a node that is
    /// already `add` or `has` changes nothing.
    pub fn check(&mut self, node: ShareNode) {
        let in_baseline = self.baseline.contains(&node.id);
        if let Some(entry) = self.entry_mut(node.id) {
            if entry.state == MembershipState::Del {
                entry.state = MembershipState::Has;
            }
            return;
        }
        let state = if in_baseline {
            MembershipState::Has
        } else {
            MembershipState::Add
        };
        self.entries.push(ShareEntry { node, state });
    }

    /// Unchecks `node`.
    ///
    /// Baseline nodes are soft-deleted to `del`; other nodes leave the set.
    pub fn uncheck(&mut self, node: &ShareNode) {
        if !self.baseline.contains(&node.id) {
            self.entries.retain(|entry| entry.node.id != node.id);
            return;
        }
        if let Some(entry) = self.entry_mut(node.id) {
            entry.state = MembershipState::Del;
            return;
        }
        self.entries.push(ShareEntry {
            node: node.clone(),
            state: MembershipState::Del,
        });
    }

    /// Returns the state of `id`, or `None` when absent.
    #[must_use]
    pub fn state_of(&self, id: Uuid) -> Option<MembershipState> {
        self.entries
            .iter()
            .find(|entry| entry.node.id == id)
            .map(|entry| entry.state)
    }

    /// Returns `true` when `id` is part of the baseline.
    #[must_use]
    pub fn in_baseline(&self, id: Uuid) -> bool {
        self.baseline.contains(&id)
    }

    /// Returns the tracked entries in check order.
    #[must_use]
    pub fn entries(&self) -> &[ShareEntry] {
        &self.entries
    }

    /// Returns the commit diff.
    #[must_use]
    pub fn diff(&self) -> ShareDiff {
        let pick = |wanted: MembershipState| {
            self.entries
                .iter()
                .filter(|entry| entry.state == wanted)
                .map(|entry| entry.node.clone())
                .collect()
        };
        ShareDiff {
            added: pick(MembershipState::Add),
            removed: pick(MembershipState::Del),
        }
    }

    /// Returns the right-hand panel summary.
    #[must_use]
    pub fn summary(&self) -> ShareSummary {
        ShareSummary {
            count: self
                .entries
                .iter()
                .filter(|entry| entry.state != MembershipState::Del)
                .count(),
            entries: self.entries.clone(),
        }
    }

    /// Returns the number of tracked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, id: Uuid) -> Option<&mut ShareEntry> {
        self.entries.iter_mut().find(|entry| entry.node.id == id)
    }
}
