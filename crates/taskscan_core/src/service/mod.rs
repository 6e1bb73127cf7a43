//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate extraction runs across sources and sinks.
//! - Apply manual edits through an explicit persistence port.

pub mod edit_service;
pub mod extraction_service;
