//! Task extraction engine.
//!
//! # Responsibility
//! - Turn page text into [`TaskRecord`](crate::model::record::TaskRecord)s
//!   for one output layout.
//!
//! # Invariants
//! - Extraction is synchronous and single-threaded.
//! - Each run owns its canonical registry; nothing is shared across runs.

pub mod fields;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod window;
