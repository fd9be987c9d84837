//! Form schema and flow instance payloads.
//!
//! These types describe what a launched task carries once its instance has
//! been loaded: the flow node it sits on, the field schema of every form
//! bound to that node, and the submitted data.

use super::WorkId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a form within a flow definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    /// Wraps a form identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A single column of a form, used as a table header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field identifier, also the key under which row data stores its value.
    pub id: String,
    /// Display name of the field.
    pub name: String,
    /// Value type of the field, such as `描述型` or `数值型`.
    pub value_type: String,
}

impl FieldSchema {
    /// Creates a field schema entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value_type: value_type.into(),
        }
    }
}

/// A form reference attached to a flow node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    /// Form identifier.
    pub id: FormId,
    /// Display name.
    pub name: String,
}

impl Form {
    /// Creates a form reference.
    #[must_use]
    pub fn new(id: FormId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A node of a flow definition's process tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Node identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Forms a submitter fills in at this node; the first is the primary one.
    #[serde(default)]
    pub primary_forms: Vec<Form>,
    /// Downstream nodes.
    #[serde(default)]
    pub children: Vec<FlowNode>,
}

impl FlowNode {
    /// Creates a node without forms or children.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary_forms: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends a primary form.
    #[must_use]
    pub fn with_form(mut self, form: Form) -> Self {
        self.primary_forms.push(form);
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Finds the node with `node_id` in this subtree, depth first.
    #[must_use]
    pub fn find(&self, node_id: &str) -> Option<&Self> {
        if self.id == node_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_id))
    }
}

/// Payload of a flow instance: the node, per-form field schema and data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    /// Current node of the instance.
    pub node: FlowNode,
    /// Field schema keyed by form.
    #[serde(default)]
    pub fields: BTreeMap<FormId, Vec<FieldSchema>>,
    /// Submitted form data.
    #[serde(default)]
    pub data: Value,
}

impl InstanceData {
    /// Creates instance data on `node` with no fields and null data.
    #[must_use]
    pub fn new(node: FlowNode) -> Self {
        Self {
            node,
            fields: BTreeMap::new(),
            data: Value::Null,
        }
    }

    /// Registers the field schema of `form`.
    #[must_use]
    pub fn with_fields(mut self, form: FormId, fields: Vec<FieldSchema>) -> Self {
        self.fields.insert(form, fields);
        self
    }

    /// Replaces the submitted data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Context produced when opening an application for a work definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyContext {
    work_id: WorkId,
    instance_data: InstanceData,
}

impl ApplyContext {
    /// Creates an apply context for `work_id`.
    #[must_use]
    pub const fn new(work_id: WorkId, instance_data: InstanceData) -> Self {
        Self {
            work_id,
            instance_data,
        }
    }

    /// Returns the work the context was opened for.
    #[must_use]
    pub const fn work_id(&self) -> WorkId {
        self.work_id
    }

    /// Returns the instance payload backing the context.
    #[must_use]
    pub const fn instance_data(&self) -> &InstanceData {
        &self.instance_data
    }

    /// Returns the primary form of the context's current node.
    #[must_use]
    pub fn primary_form(&self) -> Option<&Form> {
        let node = &self.instance_data.node;
        node.find(&node.id)
            .and_then(|current| current.primary_forms.first())
    }

    /// Returns the field schema of the primary form.
    ///
    /// The result is empty when no primary form resolves or the form has no
    /// registered fields.
    #[must_use]
    pub fn table_header(&self) -> Vec<FieldSchema> {
        self.primary_form()
            .and_then(|form| self.instance_data.fields.get(&form.id))
            .cloned()
            .unwrap_or_default()
    }
}
