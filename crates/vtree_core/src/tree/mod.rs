//! In-place tree mutators.
//!
//! # Responsibility
//! - Locate nodes by id with depth-first search from the root.
//! - Insert, edit and detach nodes on the working (`current`) tree only.
//!
//! # Invariants
//! - Mutators never panic; a missing target degrades to a reported no-op.
//! - The root itself is never detached.

pub mod mutators;
