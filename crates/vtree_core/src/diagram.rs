//! Tree diagram projection.
//!
//! Produces the positioned nodes and links a chart needs to draw the virtual
//! tree. Drawing and animation stay with the caller.

use crate::model::node::{Node, NodeId};

/// One positioned node of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: NodeId,
    pub depth: usize,
    /// Breadth coordinate in `0.0..=height`.
    pub x: f64,
    /// Depth coordinate in `0.0..=width`.
    pub y: f64,
    /// `"{type}: {text}"`.
    pub label: String,
    pub collapsed: bool,
    pub has_children: bool,
}

/// Parent-to-child edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramLink {
    pub source: NodeId,
    pub target: NodeId,
}

/// Positioned projection of one tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    /// Nodes in pre-order.
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
}

impl Diagram {
    pub fn node(&self, id: &NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }
}

/// Lays out `root` over a `height` x `width` area.
///
/// Leaves take successive, evenly spaced breadth slots; each parent sits
/// midway between its first and last child. Depth maps linearly onto
/// `0..=width`. This approximates a tidy-tree chart: there is no extra
/// separation between cousins, so subtrees are packed more evenly than
/// `d3.tree` packs them.
pub fn layout(root: &Node, height: f64, width: f64) -> Diagram {
    let mut diagram = Diagram::default();
    let mut next_leaf = 0.0;
    let mut max_depth = 0;
    place(root, 0, &mut next_leaf, &mut max_depth, &mut diagram);

    let leaf_span = (next_leaf - 1.0_f64).max(0.0);
    for node in &mut diagram.nodes {
        node.x = if leaf_span > 0.0 {
            node.x / leaf_span * height
        } else {
            height / 2.0
        };
        node.y = if max_depth > 0 {
            node.depth as f64 / max_depth as f64 * width
        } else {
            0.0
        };
    }
    diagram
}

fn place(
    node: &Node,
    depth: usize,
    next_leaf: &mut f64,
    max_depth: &mut usize,
    diagram: &mut Diagram,
) -> f64 {
    *max_depth = (*max_depth).max(depth);
    let index = diagram.nodes.len();
    diagram.nodes.push(DiagramNode {
        id: node.id.clone(),
        depth,
        x: 0.0,
        y: 0.0,
        label: format!("{}: {}", node.kind, node.text),
        collapsed: node.collapsed,
        has_children: !node.children.is_empty(),
    });

    let slot = if node.children.is_empty() {
        let slot = *next_leaf;
        *next_leaf += 1.0;
        slot
    } else {
        let mut first = None;
        let mut last = 0.0;
        for child in &node.children {
            diagram.links.push(DiagramLink {
                source: node.id.clone(),
                target: child.id.clone(),
            });
            let child_slot = place(child, depth + 1, next_leaf, max_depth, diagram);
            if first.is_none() {
                first = Some(child_slot);
            }
            last = child_slot;
        }
        (first.unwrap_or(last) + last) / 2.0
    };
    diagram.nodes[index].x = slot;
    slot
}
