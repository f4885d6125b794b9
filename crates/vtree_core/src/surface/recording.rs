//! Call-recording surface.
//!
//! Records every adapter call in order without realizing anything, so a
//! reconciliation pass can be asserted as an exact call schedule.

use crate::model::node::{AttrValue, Node, NodeId};
use crate::surface::Surface;

/// Mount handle id used by [`RecordingSurface::mount`].
pub const RECORDING_MOUNT_ID: &str = "#mount";

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create {
        id: NodeId,
        kind: String,
        parent: NodeId,
    },
    Remove {
        id: NodeId,
    },
    SetText {
        id: NodeId,
        text: String,
    },
    SetAttribute {
        id: NodeId,
        key: String,
        value: AttrValue,
    },
}

/// Surface that only records calls.
///
/// Handles are node ids; every id is assumed live. Nothing is realized, so
/// `remove` cannot tell which ids went with the element and leaves the
/// selection alone; the tree owner clears it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    selected: Option<NodeId>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to pass as the parent of the root node.
    pub fn mount(&self) -> NodeId {
        NodeId::new(RECORDING_MOUNT_ID)
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drains recorded calls, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn create_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Create { .. }))
    }

    pub fn remove_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Remove { .. }))
    }

    fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl Surface for RecordingSurface {
    type Handle = NodeId;

    fn create(&mut self, node: &Node, parent: &NodeId) -> NodeId {
        self.calls.push(SurfaceCall::Create {
            id: node.id.clone(),
            kind: node.kind.clone(),
            parent: parent.clone(),
        });
        node.id.clone()
    }

    fn remove(&mut self, id: &NodeId) {
        self.calls.push(SurfaceCall::Remove { id: id.clone() });
    }

    fn set_text(&mut self, id: &NodeId, text: &str) {
        self.calls.push(SurfaceCall::SetText {
            id: id.clone(),
            text: text.to_string(),
        });
    }

    fn set_attribute(&mut self, id: &NodeId, key: &str, value: &AttrValue) {
        self.calls.push(SurfaceCall::SetAttribute {
            id: id.clone(),
            key: key.to_string(),
            value: value.clone(),
        });
    }

    fn lookup(&self, id: &NodeId) -> Option<NodeId> {
        Some(id.clone())
    }

    fn select(&mut self, id: &NodeId) -> bool {
        self.selected = Some(id.clone());
        true
    }

    fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    fn clear_selection(&mut self) {
        self.selected = None;
    }
}
