//! Virtual tree domain model.
//!
//! # Responsibility
//! - Define the labeled node shape shared by mutators, reconciler and surfaces.
//! - Own identity generation for freshly created nodes.
//!
//! # Invariants
//! - Every node carries an `id` unique within one tree snapshot.
//! - Children are exclusively owned by their parent; snapshots never alias.

pub mod node;
