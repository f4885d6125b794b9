//! In-memory live surface.
//!
//! # Responsibility
//! - Realize virtual nodes as live elements in an `indextree` arena.
//! - Provide exclusive selection and edit/remove triggers on list items.
//!
//! # Invariants
//! - Only elements reachable from the mount are live; removing an element
//!   frees its whole subtree.
//! - A handle to a freed element never resolves again, even if the arena
//!   recycles its slot.
//! - Id lookups resolve to the first live element in document order.
//! - The selection is a node id; it marks whichever live element carries it.

use crate::model::node::{AttrValue, Attributes, Node, NodeId};
use crate::surface::{ActionRequest, Surface, SurfaceAction};
use indextree::Arena;
use log::warn;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Stable reference to one live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(indextree::NodeId);

/// Live element state.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// `None` only for the mount element.
    pub node_id: Option<NodeId>,
    pub kind: String,
    pub text: String,
    pub attributes: Attributes,
    pub actions: Vec<SurfaceAction>,
}

impl Element {
    fn mount() -> Self {
        Self {
            node_id: None,
            kind: "mount".to_string(),
            text: String::new(),
            attributes: Attributes::new(),
            actions: Vec::new(),
        }
    }

    fn from_node(node: &Node) -> Self {
        let actions = if node.is_actionable() {
            vec![SurfaceAction::Edit, SurfaceAction::Remove]
        } else {
            Vec::new()
        };
        Self {
            node_id: Some(node.id.clone()),
            kind: node.kind.clone(),
            text: node.text.clone(),
            attributes: node.attributes.clone(),
            actions,
        }
    }
}

/// Surface holding live elements in memory.
#[derive(Debug)]
pub struct MemorySurface {
    arena: Arena<Element>,
    mount: ElementHandle,
    /// Live handles per node id; more than one only while a replace is in
    /// flight.
    index: HashMap<NodeId, Vec<ElementHandle>>,
    selected: Option<NodeId>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Creates a surface with an empty mount element.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let mount = ElementHandle(arena.new_node(Element::mount()));
        Self {
            arena,
            mount,
            index: HashMap::new(),
            selected: None,
        }
    }

    pub fn mount(&self) -> ElementHandle {
        self.mount
    }

    /// Live element behind `handle`.
    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        if !self.is_attached(handle) {
            return None;
        }
        self.arena.get(handle.0).map(|node| node.get())
    }

    /// Number of live elements, excluding the mount.
    pub fn live_count(&self) -> usize {
        self.mount.0.descendants(&self.arena).count() - 1
    }

    /// Node ids of live elements in document order.
    pub fn document_ids(&self) -> Vec<NodeId> {
        self.mount
            .0
            .descendants(&self.arena)
            .filter_map(|id| self.arena.get(id)?.get().node_id.clone())
            .collect()
    }

    pub fn text_of(&self, id: &NodeId) -> Option<&str> {
        let handle = self.find_first(id)?;
        self.element(handle).map(|element| element.text.as_str())
    }

    pub fn attribute_of(&self, id: &NodeId, key: &str) -> Option<&AttrValue> {
        let handle = self.find_first(id)?;
        self.element(handle)?.attributes.get(key)
    }

    /// Live element currently carrying the selection mark.
    pub fn selected_handle(&self) -> Option<ElementHandle> {
        self.find_first(self.selected.as_ref()?)
    }

    /// Selects the node behind `handle`, clearing any previous selection.
    ///
    /// Returns `false` when `handle` is not a live node element.
    pub fn click(&mut self, handle: ElementHandle) -> bool {
        let Some(node_id) = self.element(handle).and_then(|element| element.node_id.clone())
        else {
            return false;
        };
        self.selected = Some(node_id);
        true
    }

    /// Fires one trigger on `handle`.
    ///
    /// Returns the request to route to the mutators, or `None` when the
    /// element is not live or does not expose `action`.
    pub fn trigger(&self, handle: ElementHandle, action: SurfaceAction) -> Option<ActionRequest> {
        let element = self.element(handle)?;
        if !element.actions.contains(&action) {
            return None;
        }
        Some(ActionRequest {
            action,
            target: element.node_id.clone()?,
        })
    }

    /// Indented text rendering of the live tree, `*` marking the selection.
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        let selected = self.selected_handle();
        for child in self.mount.0.children(&self.arena) {
            self.write_outline(child, 0, selected, &mut out);
        }
        out
    }

    fn write_outline(
        &self,
        id: indextree::NodeId,
        depth: usize,
        selected: Option<ElementHandle>,
        out: &mut String,
    ) {
        let Some(element) = self.arena.get(id).map(|node| node.get()) else {
            return;
        };
        let marker = if selected == Some(ElementHandle(id)) {
            "*"
        } else {
            " "
        };
        let node_id = element
            .node_id
            .as_ref()
            .map(NodeId::as_str)
            .unwrap_or_default();
        let _ = write!(out, "{marker}{}{}#{node_id}", "  ".repeat(depth), element.kind);
        if !element.text.is_empty() {
            let _ = write!(out, " {:?}", element.text);
        }
        for (key, value) in &element.attributes {
            let _ = write!(out, " [{key}={value}]");
        }
        out.push('\n');
        for child in id.children(&self.arena) {
            self.write_outline(child, depth + 1, selected, out);
        }
    }

    fn realize(&mut self, node: &Node, parent: ElementHandle) -> ElementHandle {
        let handle = ElementHandle(self.arena.new_node(Element::from_node(node)));
        parent.0.append(handle.0, &mut self.arena);
        self.index.entry(node.id.clone()).or_default().push(handle);
        for child in &node.children {
            self.realize(child, handle);
        }
        handle
    }

    fn is_attached(&self, handle: ElementHandle) -> bool {
        if handle.0.is_removed(&self.arena) {
            return false;
        }
        handle
            .0
            .ancestors(&self.arena)
            .any(|ancestor| ancestor == self.mount.0)
    }

    fn find_first(&self, id: &NodeId) -> Option<ElementHandle> {
        match self.index.get(id)?.as_slice() {
            [] => None,
            [only] => Some(*only),
            candidates => self
                .mount
                .0
                .descendants(&self.arena)
                .map(ElementHandle)
                .find(|handle| candidates.contains(handle)),
        }
    }

    fn unindex(&mut self, handle: ElementHandle) {
        let Some(node_id) = self
            .arena
            .get(handle.0)
            .and_then(|node| node.get().node_id.clone())
        else {
            return;
        };
        if let Some(handles) = self.index.get_mut(&node_id) {
            handles.retain(|candidate| *candidate != handle);
            if handles.is_empty() {
                self.index.remove(&node_id);
            }
        }
    }
}

impl Surface for MemorySurface {
    type Handle = ElementHandle;

    fn create(&mut self, node: &Node, parent: &ElementHandle) -> ElementHandle {
        if !self.is_attached(*parent) {
            warn!(
                "event=surface_create module=surface status=ignored reason=detached_parent node_id={}",
                node.id
            );
            // Orphan: never reachable from the mount, so never live.
            return ElementHandle(self.arena.new_node(Element::from_node(node)));
        }
        self.realize(node, *parent)
    }

    fn remove(&mut self, id: &NodeId) {
        let Some(handle) = self.find_first(id) else {
            return;
        };
        let doomed: Vec<ElementHandle> = handle
            .0
            .descendants(&self.arena)
            .map(ElementHandle)
            .collect();
        for element in doomed {
            self.unindex(element);
        }
        handle.0.remove_subtree(&mut self.arena);
    }

    fn set_text(&mut self, id: &NodeId, text: &str) {
        if let Some(node) = self
            .find_first(id)
            .and_then(|handle| self.arena.get_mut(handle.0))
        {
            node.get_mut().text = text.to_string();
        }
    }

    fn set_attribute(&mut self, id: &NodeId, key: &str, value: &AttrValue) {
        if let Some(node) = self
            .find_first(id)
            .and_then(|handle| self.arena.get_mut(handle.0))
        {
            node.get_mut()
                .attributes
                .insert(key.to_string(), value.clone());
        }
    }

    fn lookup(&self, id: &NodeId) -> Option<ElementHandle> {
        self.find_first(id)
    }

    fn select(&mut self, id: &NodeId) -> bool {
        match self.find_first(id) {
            Some(handle) => self.click(handle),
            None => false,
        }
    }

    /// Selected id, as long as a live element still carries it.
    fn selected(&self) -> Option<&NodeId> {
        self.selected
            .as_ref()
            .filter(|id| self.index.contains_key(*id))
    }

    fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySurface;
    use crate::model::node::{AttrValue, Node, NodeId};
    use crate::surface::{Surface, SurfaceAction};

    fn list() -> Node {
        Node::with_id("root", "div")
            .with_attribute("class", "list-group")
            .with_child(
                Node::with_id("a", "li")
                    .with_text("a")
                    .with_child(Node::with_id("a1", "li").with_text("a1")),
            )
            .with_child(Node::with_id("b", "li").with_text("b"))
    }

    fn rendered() -> MemorySurface {
        let mut surface = MemorySurface::new();
        let mount = surface.mount();
        surface.create(&list(), &mount);
        surface
    }

    #[test]
    fn create_realizes_whole_subtree() {
        let surface = rendered();

        assert_eq!(surface.live_count(), 4);
        assert_eq!(
            surface.document_ids(),
            vec![
                NodeId::new("root"),
                NodeId::new("a"),
                NodeId::new("a1"),
                NodeId::new("b")
            ]
        );
    }

    #[test]
    fn selection_is_exclusive() {
        let mut surface = rendered();

        assert!(surface.select(&NodeId::new("a")));
        assert!(surface.select(&NodeId::new("b")));
        assert_eq!(surface.selected(), Some(&NodeId::new("b")));
        assert_eq!(surface.selected_handle(), surface.lookup(&NodeId::new("b")));
        assert!(!surface.select(&NodeId::new("missing")));
        assert_eq!(surface.selected(), Some(&NodeId::new("b")));

        surface.clear_selection();
        assert_eq!(surface.selected(), None);
        assert_eq!(surface.selected_handle(), None);
    }

    #[test]
    fn removing_selected_ancestor_clears_selection() {
        let mut surface = rendered();

        surface.select(&NodeId::new("a1"));
        surface.remove(&NodeId::new("a"));

        assert_eq!(surface.selected(), None);
        assert_eq!(surface.live_count(), 2);
        assert!(surface.lookup(&NodeId::new("a1")).is_none());
    }

    #[test]
    fn selection_follows_id_onto_rebuilt_element() {
        let mut surface = rendered();
        let root = surface.lookup(&NodeId::new("root")).expect("root is live");
        surface.select(&NodeId::new("b"));
        let before = surface.selected_handle().expect("b is marked");

        let rebuilt = surface.create(&Node::with_id("b", "li").with_text("b"), &root);
        surface.remove(&NodeId::new("b"));

        assert_eq!(surface.selected(), Some(&NodeId::new("b")));
        assert_eq!(surface.selected_handle(), Some(rebuilt));
        assert_ne!(before, rebuilt);
        assert!(surface.element(before).is_none());
    }

    #[test]
    fn triggers_exist_only_on_list_items() {
        let surface = rendered();

        let root = surface.lookup(&NodeId::new("root")).expect("root is live");
        let item = surface.lookup(&NodeId::new("b")).expect("b is live");

        assert!(surface.trigger(root, SurfaceAction::Edit).is_none());
        let request = surface
            .trigger(item, SurfaceAction::Remove)
            .expect("list item exposes remove");
        assert_eq!(request.target, NodeId::new("b"));
        assert_eq!(request.action, SurfaceAction::Remove);
    }

    #[test]
    fn removed_handles_stop_resolving() {
        let mut surface = rendered();
        let item = surface.lookup(&NodeId::new("a1")).expect("a1 is live");

        surface.remove(&NodeId::new("a"));
        let root = surface.lookup(&NodeId::new("root")).expect("root is live");
        surface.create(&Node::with_id("c", "li"), &root);

        assert!(surface.element(item).is_none());
        assert!(surface.trigger(item, SurfaceAction::Edit).is_none());
        assert!(!surface.click(item));
    }

    #[test]
    fn lookup_prefers_first_element_in_document_order() {
        let mut surface = rendered();
        let root = surface.lookup(&NodeId::new("root")).expect("root is live");
        let original = surface.lookup(&NodeId::new("b")).expect("b is live");

        let duplicate = surface.create(&Node::with_id("b", "li").with_text("late"), &root);
        assert_ne!(original, duplicate);
        assert_eq!(surface.lookup(&NodeId::new("b")), Some(original));

        surface.remove(&NodeId::new("b"));
        assert_eq!(surface.lookup(&NodeId::new("b")), Some(duplicate));
        assert_eq!(surface.text_of(&NodeId::new("b")), Some("late"));
    }

    #[test]
    fn set_attribute_patches_first_match() {
        let mut surface = rendered();

        surface.set_attribute(&NodeId::new("b"), "class", &AttrValue::from("active"));

        assert_eq!(
            surface.attribute_of(&NodeId::new("b"), "class"),
            Some(&AttrValue::from("active"))
        );
        assert_eq!(
            surface.attribute_of(&NodeId::new("root"), "class"),
            Some(&AttrValue::from("list-group"))
        );
        assert_eq!(surface.attribute_of(&NodeId::new("missing"), "class"), None);
    }

    #[test]
    fn create_under_detached_parent_stays_offscreen() {
        let mut surface = rendered();
        let item = surface.lookup(&NodeId::new("a")).expect("a is live");
        surface.remove(&NodeId::new("a"));

        let orphan = surface.create(&Node::with_id("x", "li"), &item);

        assert!(surface.element(orphan).is_none());
        assert!(surface.lookup(&NodeId::new("x")).is_none());
        assert_eq!(surface.live_count(), 2);
    }

    #[test]
    fn outline_marks_selection() {
        let mut surface = rendered();
        surface.select(&NodeId::new("b"));

        let outline = surface.render_outline();
        assert!(outline.starts_with(" div#root [class=list-group]\n"));
        assert!(outline.contains("*  li#b \"b\""));
    }
}
