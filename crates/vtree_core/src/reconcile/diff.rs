//! Positional lockstep diff over two node trees.

use crate::model::node::Node;
use crate::surface::Surface;
use log::debug;

/// Counts of surface calls issued by one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// `create` calls (one per realized subtree root).
    pub created: usize,
    /// `remove` calls.
    pub removed: usize,
    pub text_updates: usize,
    pub attribute_updates: usize,
    /// Nodes present on both sides with the same identity, patched in place
    /// (text and attribute updates included).
    pub matched: usize,
}

impl ReconcileReport {
    /// Total adapter calls issued.
    pub fn calls(&self) -> usize {
        self.created + self.removed + self.text_updates + self.attribute_updates
    }

    pub fn is_noop(&self) -> bool {
        self.calls() == 0
    }
}

/// Converges `surface` from `previous` to `current` under `parent`.
///
/// Cases, in order:
/// - only `current`: realize it under `parent`;
/// - only `previous`: remove its element (descendants go with it);
/// - `kind` or `id` differ: remove the old element, realize the new node;
/// - otherwise patch text, patch changed or added attributes, then recurse
///   into children index by index.
pub fn reconcile<S: Surface>(
    previous: Option<&Node>,
    current: Option<&Node>,
    parent: &S::Handle,
    surface: &mut S,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    diff_node(previous, current, Some(parent), surface, &mut report);
    debug!(
        "event=reconcile module=reconcile status=ok created={} removed={} text_updates={} attribute_updates={} matched={}",
        report.created,
        report.removed,
        report.text_updates,
        report.attribute_updates,
        report.matched
    );
    report
}

fn diff_node<S: Surface>(
    previous: Option<&Node>,
    current: Option<&Node>,
    parent: Option<&S::Handle>,
    surface: &mut S,
    report: &mut ReconcileReport,
) {
    match (previous, current) {
        (None, None) => {}
        (None, Some(current)) => realize(current, parent, surface, report),
        (Some(previous), None) => {
            surface.remove(&previous.id);
            report.removed += 1;
        }
        (Some(previous), Some(current))
            if previous.kind != current.kind || previous.id != current.id =>
        {
            surface.remove(&previous.id);
            report.removed += 1;
            realize(current, parent, surface, report);
        }
        (Some(previous), Some(current)) => patch(previous, current, surface, report),
    }
}

fn realize<S: Surface>(
    node: &Node,
    parent: Option<&S::Handle>,
    surface: &mut S,
    report: &mut ReconcileReport,
) {
    // A parent without a live element swallows its new children.
    let Some(parent) = parent else {
        debug!(
            "event=reconcile_create module=reconcile status=ignored reason=no_live_parent node_id={}",
            node.id
        );
        return;
    };
    surface.create(node, parent);
    report.created += 1;
}

fn patch<S: Surface>(
    previous: &Node,
    current: &Node,
    surface: &mut S,
    report: &mut ReconcileReport,
) {
    report.matched += 1;

    if previous.text != current.text {
        surface.set_text(&current.id, &current.text);
        report.text_updates += 1;
    }

    for (key, value) in &current.attributes {
        if previous.attributes.get(key) != Some(value) {
            surface.set_attribute(&current.id, key, value);
            report.attribute_updates += 1;
        }
    }

    let element = surface.lookup(&current.id);
    let len = previous.children.len().max(current.children.len());
    for index in 0..len {
        diff_node(
            previous.children.get(index),
            current.children.get(index),
            element.as_ref(),
            surface,
            report,
        );
    }
}
