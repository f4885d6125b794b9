//! Core of the virtual tree task list.
//! Owns the node model, the mutators and the snapshot reconciler that keeps a
//! live surface in step with the working tree.

pub mod diagram;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod service;
pub mod snapshot;
pub mod surface;
pub mod tree;

pub use diagram::{layout, Diagram, DiagramLink, DiagramNode};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::node::{
    create_node, AttrValue, Attributes, Node, NodeId, KIND_CONTAINER, KIND_LIST_ITEM,
};
pub use reconcile::{reconcile, ReconcileReport};
pub use service::task_service::{
    IgnoredReason, MutationOutcome, TaskChange, TaskList, TaskListConfig,
};
pub use snapshot::SnapshotLifecycle;
pub use surface::{
    ActionRequest, Element, ElementHandle, MemorySurface, RecordingSurface, Surface,
    SurfaceAction, SurfaceCall,
};
pub use tree::mutators::{
    contains, edit_text, find, find_mut, insert_child, remove_node, TextEdit,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
