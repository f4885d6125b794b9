//! Previous/current snapshot ownership.
//!
//! # Responsibility
//! - Own the working tree, the last reconciled snapshot and the live surface.
//! - Run exactly one reconciliation pass per committed mutation.
//!
//! # Invariants
//! - `previous` is a deep copy taken after the last pass; it is never
//!   mutated between commits.
//! - The root node is realized once at construction and never removed.

use crate::model::node::Node;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::surface::Surface;
use log::debug;

/// Snapshot pair bound to one live surface.
pub struct SnapshotLifecycle<S: Surface> {
    surface: S,
    mount: S::Handle,
    current: Node,
    previous: Node,
    commits: u64,
}

impl<S: Surface> SnapshotLifecycle<S> {
    /// Renders `root` in full under `mount` and takes the first snapshot.
    pub fn new(root: Node, mut surface: S, mount: S::Handle) -> Self {
        surface.create(&root, &mount);
        debug!(
            "event=initial_render module=snapshot status=ok root_id={} nodes={}",
            root.id,
            root.subtree_len()
        );
        let previous = root.clone();
        Self {
            surface,
            mount,
            current: root,
            previous,
            commits: 0,
        }
    }

    /// Working tree.
    pub fn current(&self) -> &Node {
        &self.current
    }

    /// Mutable working tree.
    ///
    /// Callers that mutate through this must follow up with exactly one
    /// [`Self::commit_and_reconcile`]; prefer [`Self::mutate`].
    pub fn current_mut(&mut self) -> &mut Node {
        &mut self.current
    }

    /// Snapshot taken after the last reconciliation pass.
    pub fn previous(&self) -> &Node {
        &self.previous
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn mount(&self) -> &S::Handle {
        &self.mount
    }

    /// Number of reconciliation passes run so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Reconciles `previous` against `current`, then snapshots `current`.
    pub fn commit_and_reconcile(&mut self) -> ReconcileReport {
        let report = reconcile(
            Some(&self.previous),
            Some(&self.current),
            &self.mount,
            &mut self.surface,
        );
        self.previous = self.current.clone();
        self.commits += 1;
        debug!(
            "event=commit module=snapshot status=ok commit={} calls={}",
            self.commits,
            report.calls()
        );
        report
    }

    /// Applies `change` to the working tree and commits once.
    pub fn mutate<R>(&mut self, change: impl FnOnce(&mut Node) -> R) -> (R, ReconcileReport) {
        let value = change(&mut self.current);
        let report = self.commit_and_reconcile();
        (value, report)
    }

    /// Releases the surface, dropping both snapshots.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotLifecycle;
    use crate::model::node::{Node, NodeId};
    use crate::surface::{RecordingSurface, Surface, SurfaceCall};

    fn lifecycle() -> SnapshotLifecycle<RecordingSurface> {
        let surface = RecordingSurface::new();
        let mount = surface.mount();
        SnapshotLifecycle::new(Node::with_id("root", "div"), surface, mount)
    }

    #[test]
    fn construction_renders_root_once() {
        let lifecycle = lifecycle();
        assert_eq!(lifecycle.surface().create_count(), 1);
        assert_eq!(lifecycle.commits(), 0);
        assert_eq!(lifecycle.previous(), lifecycle.current());
    }

    #[test]
    fn commit_without_changes_is_a_noop_pass() {
        let mut lifecycle = lifecycle();
        lifecycle.surface_mut().take_calls();

        let report = lifecycle.commit_and_reconcile();

        assert!(report.is_noop());
        assert!(lifecycle.surface().calls().is_empty());
        assert_eq!(lifecycle.commits(), 1);
    }

    #[test]
    fn mutate_commits_and_refreshes_previous() {
        let mut lifecycle = lifecycle();
        lifecycle.surface_mut().take_calls();

        let (_, report) = lifecycle.mutate(|tree| tree.children.push(Node::with_id("a", "li")));

        assert_eq!(report.created, 1);
        assert_eq!(lifecycle.previous().children.len(), 1);
        assert_eq!(
            lifecycle.surface_mut().take_calls(),
            vec![SurfaceCall::Create {
                id: NodeId::new("a"),
                kind: "li".to_string(),
                parent: NodeId::new("root"),
            }]
        );
    }

    #[test]
    fn previous_is_isolated_from_current_edits() {
        let mut lifecycle = lifecycle();
        lifecycle.mutate(|tree| tree.children.push(Node::with_id("a", "li").with_text("x")));

        lifecycle.current_mut().children[0].text = "y".to_string();

        assert_eq!(lifecycle.previous().children[0].text, "x");
        assert!(lifecycle.surface().selected().is_none());
    }
}
