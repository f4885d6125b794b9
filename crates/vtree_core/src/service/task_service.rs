//! Task list use-case service.
//!
//! # Responsibility
//! - Provide the add/sub-task/edit/remove entry points of the task list.
//! - Report ignored requests as a distinct outcome instead of failing.
//!
//! # Invariants
//! - Requests rejected before touching the tree (blank text, no selection,
//!   cancelled edit) do not reconcile.
//! - Every request that reached the tree is followed by exactly one
//!   reconciliation pass.
//! - The root is never removed.
//! - The selection is a node id and survives passes that rebuild its element;
//!   it is cleared only once that id leaves the tree.

use crate::model::node::{
    create_node, Attributes, Node, NodeId, KIND_CONTAINER, KIND_LIST_ITEM,
};
use crate::reconcile::ReconcileReport;
use crate::snapshot::SnapshotLifecycle;
use crate::surface::{ActionRequest, Surface, SurfaceAction};
use crate::tree::mutators::{contains, edit_text, insert_child, remove_node};
use log::{debug, info};
use std::fmt::{Display, Formatter};

/// Vocabulary used to build task list nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListConfig {
    pub root_id: String,
    pub root_kind: String,
    pub root_class: String,
    pub item_kind: String,
    pub item_class: String,
}

impl Default for TaskListConfig {
    fn default() -> Self {
        Self {
            root_id: "root".to_string(),
            root_kind: KIND_CONTAINER.to_string(),
            root_class: "list-group".to_string(),
            item_kind: KIND_LIST_ITEM.to_string(),
            item_class: "list-group-item".to_string(),
        }
    }
}

impl TaskListConfig {
    /// Builds the initial, childless root node.
    pub fn root_node(&self) -> Node {
        Node::with_id(self.root_id.as_str(), self.root_kind.as_str())
            .with_attribute("class", self.root_class.as_str())
    }

    /// Builds a fresh task item carrying `text`.
    pub fn item_node(&self, text: &str) -> Node {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), self.item_class.as_str().into());
        create_node(self.item_kind.as_str(), &attributes, Vec::new(), text)
    }
}

/// Why a request left the tree untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Text is blank after trim.
    EmptyText,
    /// Sub-task requested without a selected node.
    NoSelection,
    /// Edit prompt was dismissed.
    Cancelled,
    /// Insert target does not exist in the current tree.
    ParentNotFound(NodeId),
    /// Edit/remove target does not exist in the current tree.
    NodeNotFound(NodeId),
    /// Removal of the root was requested.
    RootNotRemovable,
}

impl Display for IgnoredReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text must not be blank"),
            Self::NoSelection => write!(f, "no task is selected"),
            Self::Cancelled => write!(f, "request was cancelled"),
            Self::ParentNotFound(id) => write!(f, "parent node not found: {id}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::RootNotRemovable => write!(f, "root node cannot be removed"),
        }
    }
}

impl IgnoredReason {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::NoSelection => "no_selection",
            Self::Cancelled => "cancelled",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::NodeNotFound(_) => "node_not_found",
            Self::RootNotRemovable => "root_not_removable",
        }
    }
}

/// Result of one mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The tree changed (or was edited in place) for `node_id`.
    Applied { node_id: NodeId },
    /// The request was a no-op.
    Ignored(IgnoredReason),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::Applied { node_id } => Some(node_id),
            Self::Ignored(_) => None,
        }
    }
}

/// Outcome plus the reconciliation pass it triggered, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    pub outcome: MutationOutcome,
    pub report: Option<ReconcileReport>,
}

impl TaskChange {
    fn rejected(operation: &str, reason: IgnoredReason) -> Self {
        info!(
            "event={operation} module=service status=ignored reason={}",
            reason.code()
        );
        Self {
            outcome: MutationOutcome::Ignored(reason),
            report: None,
        }
    }

    fn committed(operation: &str, outcome: MutationOutcome, report: ReconcileReport) -> Self {
        match &outcome {
            MutationOutcome::Applied { node_id } => info!(
                "event={operation} module=service status=ok node_id={node_id} calls={}",
                report.calls()
            ),
            MutationOutcome::Ignored(reason) => info!(
                "event={operation} module=service status=ignored reason={} calls={}",
                reason.code(),
                report.calls()
            ),
        }
        Self {
            outcome,
            report: Some(report),
        }
    }
}

/// Task list facade over one snapshot lifecycle.
pub struct TaskList<S: Surface> {
    lifecycle: SnapshotLifecycle<S>,
    config: TaskListConfig,
}

impl<S: Surface> TaskList<S> {
    /// Creates a task list with an empty root rendered under `mount`.
    pub fn new(config: TaskListConfig, surface: S, mount: S::Handle) -> Self {
        let lifecycle = SnapshotLifecycle::new(config.root_node(), surface, mount);
        Self { lifecycle, config }
    }

    pub fn config(&self) -> &TaskListConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &SnapshotLifecycle<S> {
        &self.lifecycle
    }

    pub fn current(&self) -> &Node {
        self.lifecycle.current()
    }

    pub fn surface(&self) -> &S {
        self.lifecycle.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.lifecycle.surface_mut()
    }

    /// Marks `id` as the selected task on the surface.
    pub fn select(&mut self, id: &NodeId) -> bool {
        self.lifecycle.surface_mut().select(id)
    }

    /// Currently selected node id.
    pub fn selected(&self) -> Option<&NodeId> {
        self.lifecycle.surface().selected()
    }

    /// Appends a task with trimmed `text` to the root.
    pub fn add_task(&mut self, text: &str) -> TaskChange {
        let root_id = self.lifecycle.current().id.clone();
        self.add_child("task_add", root_id, text)
    }

    /// Appends a task with trimmed `text` under the selected node.
    pub fn add_sub_task(&mut self, text: &str) -> TaskChange {
        let Some(parent_id) = self.selected().cloned() else {
            return TaskChange::rejected("sub_task_add", IgnoredReason::NoSelection);
        };
        self.add_child("sub_task_add", parent_id, text)
    }

    /// Replaces the text of `id`; `None` means the prompt was dismissed.
    ///
    /// Blank text keeps the current text but still runs a pass.
    pub fn edit_task(&mut self, id: &NodeId, new_text: Option<&str>) -> TaskChange {
        let Some(new_text) = new_text else {
            return TaskChange::rejected("task_edit", IgnoredReason::Cancelled);
        };
        let (edit, report) = self.mutate(|tree| edit_text(tree, id, new_text));
        debug!(
            "event=task_edit module=service visited={} matched={} changed={}",
            edit.visited, edit.matched, edit.changed
        );
        let outcome = if edit.matched == 0 {
            MutationOutcome::Ignored(IgnoredReason::NodeNotFound(id.clone()))
        } else if new_text.trim().is_empty() {
            MutationOutcome::Ignored(IgnoredReason::EmptyText)
        } else {
            MutationOutcome::Applied {
                node_id: id.clone(),
            }
        };
        TaskChange::committed("task_edit", outcome, report)
    }

    /// Detaches `id` and its subtree from the tree.
    pub fn remove_task(&mut self, id: &NodeId) -> TaskChange {
        let is_root = &self.lifecycle.current().id == id;
        let (removed, report) = self.mutate(|tree| remove_node(tree, id));
        let outcome = match removed {
            Some(node) => MutationOutcome::Applied { node_id: node.id },
            None if is_root => MutationOutcome::Ignored(IgnoredReason::RootNotRemovable),
            None => MutationOutcome::Ignored(IgnoredReason::NodeNotFound(id.clone())),
        };
        TaskChange::committed("task_remove", outcome, report)
    }

    /// Routes a surface trigger to the matching mutator.
    ///
    /// `text` is the prompt answer for edits and is ignored for removals.
    pub fn handle_action(&mut self, request: &ActionRequest, text: Option<&str>) -> TaskChange {
        match request.action {
            SurfaceAction::Edit => self.edit_task(&request.target, text),
            SurfaceAction::Remove => self.remove_task(&request.target),
        }
    }

    /// Releases the surface.
    pub fn into_surface(self) -> S {
        self.lifecycle.into_surface()
    }

    fn add_child(&mut self, operation: &str, parent_id: NodeId, text: &str) -> TaskChange {
        let text = text.trim();
        if text.is_empty() {
            return TaskChange::rejected(operation, IgnoredReason::EmptyText);
        }
        let node = self.config.item_node(text);
        let node_id = node.id.clone();
        let (inserted, report) = self.mutate(|tree| insert_child(tree, &parent_id, node).is_ok());
        let outcome = if inserted {
            MutationOutcome::Applied { node_id }
        } else {
            MutationOutcome::Ignored(IgnoredReason::ParentNotFound(parent_id))
        };
        TaskChange::committed(operation, outcome, report)
    }

    /// Commits `change`, then drops a selection whose node left the tree.
    fn mutate<R>(&mut self, change: impl FnOnce(&mut Node) -> R) -> (R, ReconcileReport) {
        let result = self.lifecycle.mutate(change);
        let stale = self
            .selected()
            .is_some_and(|id| !contains(self.lifecycle.current(), id));
        if stale {
            debug!("event=selection_clear module=service status=ok reason=node_removed");
            self.lifecycle.surface_mut().clear_selection();
        }
        result
    }
}
