//! Core use-case services.
//!
//! # Responsibility
//! - Turn add/edit/remove requests into tree mutations plus one
//!   reconciliation pass each.
//! - Keep surface wiring and input validation out of the reconciler.

pub mod task_service;
