//! Authority tree nodes and relative `disabled` annotation.

use super::{AuthorityId, TargetId};
use serde::{Deserialize, Serialize};

/// A node of a space's authority (permission) hierarchy.
///
/// `disabled` is not stored; it is recomputed by [`AuthorityNode::annotated`]
/// relative to whichever entity is viewing the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityNode {
    id: AuthorityId,
    name: String,
    code: String,
    belong_id: Option<TargetId>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    children: Vec<AuthorityNode>,
}

impl AuthorityNode {
    /// Creates a leaf authority node.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        belong_id: Option<TargetId>,
    ) -> Self {
        Self {
            id: AuthorityId::new(),
            name: name.into(),
            code: code.into(),
            belong_id,
            disabled: false,
            children: Vec::new(),
        }
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the node identifier.
    #[must_use]
    pub const fn id(&self) -> AuthorityId {
        self.id
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the space the node was defined in, if any.
    #[must_use]
    pub const fn belong_id(&self) -> Option<TargetId> {
        self.belong_id
    }

    /// Returns whether the node is disabled for the current viewer.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the child nodes.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the tree with every node's `disabled` flag recomputed.
    ///
    /// A node is enabled only when its own `belong_id` equals `relative_to`.
    #[must_use]
    pub fn annotated(mut self, relative_to: TargetId) -> Self {
        self.annotate(relative_to);
        self
    }

    fn annotate(&mut self, relative_to: TargetId) {
        self.disabled = self.belong_id != Some(relative_to);
        for child in &mut self.children {
            child.annotate(relative_to);
        }
    }

    /// Finds a node anywhere in the subtree.
    #[must_use]
    pub fn find(&self, id: AuthorityId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Counts the nodes in the subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}
