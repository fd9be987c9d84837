//! Nodes that can be checked into a share.

use crate::target::domain::{AuthorityNode, Identity, Target};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node recorded in a share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareNode {
    /// Node identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

impl ShareNode {
    /// Creates a share node.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&Target> for ShareNode {
    fn from(target: &Target) -> Self {
        Self::new(target.id().into_inner(), target.name())
    }
}

impl From<&CandidateNode> for ShareNode {
    fn from(candidate: &CandidateNode) -> Self {
        Self::new(candidate.id, candidate.name.clone())
    }
}

/// A center-panel candidate, possibly nested and possibly not selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNode {
    /// Node identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Disabled candidates cannot be checked.
    pub disabled: bool,
    /// Nested candidates.
    pub children: Vec<CandidateNode>,
}

impl CandidateNode {
    /// Creates a selectable leaf candidate.
    #[must_use]
    pub fn leaf(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            disabled: false,
            children: Vec::new(),
        }
    }

    /// Finds the candidate with `id` in this subtree.
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

impl From<&AuthorityNode> for CandidateNode {
    fn from(node: &AuthorityNode) -> Self {
        Self {
            id: node.id().into_inner(),
            name: node.name().to_owned(),
            disabled: node.disabled(),
            children: node.children().iter().map(Self::from).collect(),
        }
    }
}

impl From<&Identity> for CandidateNode {
    fn from(identity: &Identity) -> Self {
        Self::leaf(identity.id().into_inner(), identity.name())
    }
}

impl From<&Target> for CandidateNode {
    fn from(target: &Target) -> Self {
        Self::leaf(target.id().into_inner(), target.name())
    }
}
