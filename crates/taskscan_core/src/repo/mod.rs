//! Repository layer for extracted task records.
//!
//! # Responsibility
//! - Define the record sink contract used by extraction runs.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Persistence is append-only; stored rows are never updated or deleted.

pub mod record_repo;
