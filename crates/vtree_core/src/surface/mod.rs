//! Live surface adapter contract.
//!
//! # Responsibility
//! - Define the calls the reconciler issues to realize decisions on a live
//!   presentation surface.
//! - Provide in-process surfaces for tests and the CLI smoke run.
//!
//! # Invariants
//! - `create` realizes the node and all of its descendants in one call.
//! - `remove` destroys the element and its descendants; the reconciler never
//!   recurses into removed children.
//! - The selection is one node id. Surfaces that track liveness drop it
//!   from `selected` once no live element carries the id; owners of the tree
//!   call `clear_selection` once the node leaves it.
//! - Element lookups by id resolve to the first match in document order.

use crate::model::node::{AttrValue, Node, NodeId};
use std::fmt::Debug;

pub mod memory;
pub mod recording;

pub use memory::{Element, ElementHandle, MemorySurface};
pub use recording::{RecordingSurface, SurfaceCall};

/// Adapter the reconciler drives to converge a live surface.
pub trait Surface {
    /// Live element reference handed back by `create`.
    type Handle: Clone + Debug;

    /// Realizes `node` and its whole subtree under `parent`.
    fn create(&mut self, node: &Node, parent: &Self::Handle) -> Self::Handle;
    /// Detaches and destroys the live element carrying `id`.
    fn remove(&mut self, id: &NodeId);
    /// Replaces the text of the live element carrying `id`.
    fn set_text(&mut self, id: &NodeId, text: &str);
    /// Sets one attribute on the live element carrying `id`.
    fn set_attribute(&mut self, id: &NodeId, key: &str, value: &AttrValue);
    /// Resolves the live element carrying `id`, if any.
    fn lookup(&self, id: &NodeId) -> Option<Self::Handle>;
    /// Marks the element carrying `id` as the single selected element.
    ///
    /// Returns `false` when no live element carries `id`.
    fn select(&mut self, id: &NodeId) -> bool;
    /// Node id of the currently selected element.
    fn selected(&self) -> Option<&NodeId>;
    /// Drops the selection.
    fn clear_selection(&mut self);
}

/// Trigger kind exposed by actionable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    Edit,
    Remove,
}

/// Request raised by a surface trigger, routed by the caller to a mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: SurfaceAction,
    pub target: NodeId,
}
