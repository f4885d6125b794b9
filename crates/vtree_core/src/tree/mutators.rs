//! Id-addressed insert/edit/remove over a virtual tree.

use crate::model::node::{Node, NodeId};

/// Result of one full-traversal text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextEdit {
    /// Nodes visited; always the full tree size.
    pub visited: usize,
    /// Nodes whose id matched the target.
    pub matched: usize,
    /// Nodes whose text actually changed.
    pub changed: usize,
}

/// Finds a node by id (pre-order, first match).
pub fn find<'a>(root: &'a Node, id: &NodeId) -> Option<&'a Node> {
    if &root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find(child, id))
}

/// Mutable counterpart of [`find`].
pub fn find_mut<'a>(root: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if &root.id == id {
        return Some(root);
    }
    root.children
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

/// Returns whether `id` occurs anywhere under (and including) `root`.
pub fn contains(root: &Node, id: &NodeId) -> bool {
    find(root, id).is_some()
}

/// Appends `node` to the children of `parent_id`.
///
/// # Errors
/// - Hands `node` back unchanged when `parent_id` is not in the tree.
pub fn insert_child(root: &mut Node, parent_id: &NodeId, node: Node) -> Result<(), Node> {
    match find_mut(root, parent_id) {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => Err(node),
    }
}

/// Replaces the text of the node `id` with `new_text` trimmed.
///
/// Blank input keeps the current text. Every node is visited exactly once,
/// even after the target was found.
pub fn edit_text(root: &mut Node, id: &NodeId, new_text: &str) -> TextEdit {
    let trimmed = new_text.trim();
    let mut report = TextEdit::default();
    update_text(root, id, trimmed, &mut report);
    report
}

fn update_text(node: &mut Node, id: &NodeId, text: &str, report: &mut TextEdit) {
    report.visited += 1;
    if &node.id == id {
        report.matched += 1;
        if !text.is_empty() && node.text != text {
            node.text = text.to_string();
            report.changed += 1;
        }
    }
    for child in &mut node.children {
        update_text(child, id, text, report);
    }
}

/// Detaches the node `id` (with its whole subtree) from its parent.
///
/// Returns the detached subtree, or `None` when `id` is absent or names the
/// root. Surviving siblings are still searched, but a detached subtree is
/// not descended into.
pub fn remove_node(root: &mut Node, id: &NodeId) -> Option<Node> {
    let mut removed = None;
    detach(root, id, &mut removed);
    removed
}

fn detach(node: &mut Node, id: &NodeId, removed: &mut Option<Node>) {
    let mut index = 0;
    while index < node.children.len() {
        if &node.children[index].id == id {
            let child = node.children.remove(index);
            if removed.is_none() {
                *removed = Some(child);
            }
            continue;
        }
        detach(&mut node.children[index], id, removed);
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{edit_text, find, insert_child, remove_node};
    use crate::model::node::{Node, NodeId};

    fn sample() -> Node {
        Node::with_id("root", "div")
            .with_child(
                Node::with_id("a", "li")
                    .with_text("a")
                    .with_child(Node::with_id("a1", "li").with_text("a1")),
            )
            .with_child(Node::with_id("b", "li").with_text("b"))
    }

    #[test]
    fn insert_child_appends_at_tail() {
        let mut tree = sample();
        insert_child(&mut tree, &NodeId::new("a"), Node::with_id("a2", "li"))
            .expect("parent exists");

        let parent = find(&tree, &NodeId::new("a")).expect("a exists");
        assert_eq!(parent.children.last().map(|n| n.id.as_str()), Some("a2"));
    }

    #[test]
    fn insert_child_returns_node_for_missing_parent() {
        let mut tree = sample();
        let before = tree.clone();
        let rejected = insert_child(&mut tree, &NodeId::new("zz"), Node::with_id("x", "li"))
            .expect_err("missing parent must hand the node back");
        assert_eq!(rejected.id, NodeId::new("x"));
        assert_eq!(tree, before);
    }

    #[test]
    fn edit_text_visits_every_node_once() {
        let mut tree = sample();
        let report = edit_text(&mut tree, &NodeId::new("a"), "  renamed  ");
        assert_eq!(report.visited, 4);
        assert_eq!(report.matched, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(
            find(&tree, &NodeId::new("a")).map(|n| n.text.as_str()),
            Some("renamed")
        );
    }

    #[test]
    fn edit_text_keeps_text_on_blank_input() {
        let mut tree = sample();
        let report = edit_text(&mut tree, &NodeId::new("b"), "   ");
        assert_eq!(report.matched, 1);
        assert_eq!(report.changed, 0);
        assert_eq!(
            find(&tree, &NodeId::new("b")).map(|n| n.text.as_str()),
            Some("b")
        );
    }

    #[test]
    fn remove_node_detaches_nested_subtree() {
        let mut tree = sample();
        let removed = remove_node(&mut tree, &NodeId::new("a")).expect("a is removable");
        assert_eq!(removed.subtree_len(), 2);
        assert_eq!(tree.ids(), vec![NodeId::new("root"), NodeId::new("b")]);
    }

    #[test]
    fn remove_node_ignores_root() {
        let mut tree = sample();
        assert!(remove_node(&mut tree, &NodeId::new("root")).is_none());
        assert_eq!(tree.subtree_len(), 4);
    }
}
