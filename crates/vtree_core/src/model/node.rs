//! Node domain model.
//!
//! # Responsibility
//! - Define the canonical virtual tree node and its attribute bag.
//! - Provide constructors that assign fresh, collision-resistant ids.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reassigned by edits.
//! - `collapsed` is a presentation hint only; it never takes part in diffing.
//! - `Clone` is a deep copy: a cloned tree shares nothing with its source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Kind tag used for container nodes (the task list root).
pub const KIND_CONTAINER: &str = "div";
/// Kind tag used for actionable list items.
pub const KIND_LIST_ITEM: &str = "li";

/// Opaque node identifier, unique within one tree snapshot.
///
/// Generated ids are UUID v4 in simple form, so they are safe to use as
/// element ids on any surface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps a caller-provided id.
    ///
    /// Used for well-known nodes (`"root"`) and fixtures where identity
    /// already exists externally.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh id that no other call in this process yields.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Scalar attribute value.
///
/// Untagged on the wire, so `{"class": "x", "tabindex": 0}` round-trips as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Attribute bag keyed by attribute name.
///
/// Insertion order is irrelevant; `BTreeMap` keeps iteration deterministic.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Labeled virtual tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity, preserved across text/attribute edits.
    pub id: NodeId,
    /// Serialized as `type` to match the tree's external naming.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Attributes,
    /// Ordered children; position is significant for reconciliation.
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub text: String,
    /// Presentation hint for the tree diagram.
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Node {
    /// Creates an empty node with a caller-provided id.
    pub fn with_id(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            text: String::new(),
            collapsed: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Returns whether surfaces should expose edit/remove triggers for this node.
    pub fn is_actionable(&self) -> bool {
        self.kind == KIND_LIST_ITEM
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Ids of this subtree in pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.subtree_len());
        collect_ids(self, &mut out);
        out
    }
}

fn collect_ids(node: &Node, out: &mut Vec<NodeId>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}

/// Creates a node with a fresh id from its parts.
///
/// `attributes` is copied; `children` defaults to empty and `text` to `""`
/// when callers pass `Vec::new()` / `""`.
pub fn create_node(
    kind: impl Into<String>,
    attributes: &Attributes,
    children: Vec<Node>,
    text: impl Into<String>,
) -> Node {
    Node {
        id: NodeId::generate(),
        kind: kind.into(),
        attributes: attributes.clone(),
        children,
        text: text.into(),
        collapsed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        create_node, AttrValue, Attributes, Node, NodeId, KIND_CONTAINER, KIND_LIST_ITEM,
    };
    use std::collections::HashSet;

    #[test]
    fn generated_ids_do_not_collide() {
        let ids: HashSet<NodeId> = (0..10_000).map(|_| NodeId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn generated_ids_are_hyphen_free() {
        let id = NodeId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(!id.as_str().contains('-'));
    }

    #[test]
    fn create_node_copies_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), "list-group-item".into());

        let node = create_node(KIND_LIST_ITEM, &attributes, Vec::new(), "buy milk");
        attributes.insert("class".to_string(), "changed".into());

        assert_eq!(node.attributes["class"], AttrValue::from("list-group-item"));
        assert_eq!(node.text, "buy milk");
        assert!(node.children.is_empty());
        assert!(node.is_actionable());
    }

    #[test]
    fn subtree_len_and_ids_walk_pre_order() {
        let tree = Node::with_id("r", KIND_CONTAINER)
            .with_child(Node::with_id("a", KIND_LIST_ITEM).with_child(Node::with_id("a1", "li")))
            .with_child(Node::with_id("b", KIND_LIST_ITEM));

        assert_eq!(tree.subtree_len(), 4);
        assert_eq!(
            tree.ids(),
            vec![
                NodeId::new("r"),
                NodeId::new("a"),
                NodeId::new("a1"),
                NodeId::new("b")
            ]
        );
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let original = Node::with_id("r", KIND_CONTAINER).with_child(Node::with_id("a", "li"));
        let mut copy = original.clone();
        copy.children[0].text = "edited".to_string();

        assert_eq!(original.children[0].text, "");
        assert_ne!(original, copy);
    }
}
