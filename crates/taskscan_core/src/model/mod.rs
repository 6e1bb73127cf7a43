//! Output data model.
//!
//! # Responsibility
//! - Define the task record produced by extraction runs.
//! - Declare the four output layouts and their column sets.
//!
//! # Invariants
//! - Records are append-only once handed to a sink.

pub mod layout;
pub mod record;
