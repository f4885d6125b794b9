//! Snapshot reconciliation.
//!
//! # Responsibility
//! - Walk the previous snapshot and the current tree in lockstep.
//! - Emit the surface calls that converge the live surface to `current`.
//!
//! # Invariants
//! - Nodes with equal `id` and `kind` keep their live element.
//! - Children are matched by position, never by identity.
//! - Attributes dropped from a node are not retracted from the surface.
//! - Reconciliation never fails; absence on either side is a terminal case.

pub mod diff;

pub use diff::{reconcile, ReconcileReport};
