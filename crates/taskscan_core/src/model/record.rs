//! Task record domain model.
//!
//! # Responsibility
//! - Define the output row shared by every layout.
//! - Own the length rule applied to manual cell edits.
//!
//! # Invariants
//! - `reference` holds the verbatim context span every other field was
//!   derived from.
//! - `margin` starts as [`DEFAULT_MARGIN`]; only user edits change it.
//! - Fields a layout does not extract keep the [`PLACEHOLDER`] value.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cell value for a field that could not be recovered.
pub const PLACEHOLDER: &str = "-";
/// Margin assigned when a record is created.
pub const DEFAULT_MARGIN: &str = "0";
/// Shortest accepted manual edit, in characters.
pub const EDIT_MIN_CHARS: usize = 3;
/// Longest accepted manual edit, in characters.
pub const EDIT_MAX_CHARS: usize = 15;

/// One extracted maintenance-task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Chapter-subchapter code such as `21-51`, or empty.
    pub ata: String,
    /// Six-group slash code such as `21/51/10/601/001/001`.
    pub task_number: String,
    pub description: String,
    /// Canonical manufacturer part number (`MP/N`).
    pub part_number: String,
    /// Reference number paired with `part_number` (`PN`).
    pub reference_number: String,
    /// Formatted limit or interval, e.g. `60 M` or `600 FH, 12 M`.
    pub limit: String,
    pub margin: String,
    /// Canonical documentation references as one cell.
    pub documentation: String,
    /// Verbatim context span for audit.
    pub reference: String,
}

impl TaskRecord {
    /// Creates a record for one anchor with every other field defaulted.
    pub fn new(task_number: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            ata: String::new(),
            task_number: task_number.into(),
            description: PLACEHOLDER.to_string(),
            part_number: PLACEHOLDER.to_string(),
            reference_number: PLACEHOLDER.to_string(),
            limit: PLACEHOLDER.to_string(),
            margin: DEFAULT_MARGIN.to_string(),
            documentation: PLACEHOLDER.to_string(),
            reference: reference.into(),
        }
    }
}

/// Rejected manual edit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    InvalidLength { chars: usize },
}

impl Display for FieldValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength { chars } => write!(
                f,
                "please enter between {EDIT_MIN_CHARS} and {EDIT_MAX_CHARS} characters (got {chars})"
            ),
        }
    }
}

impl Error for FieldValidationError {}

/// Checks a manually edited cell value against the accepted length bound.
///
/// Length is counted in characters, not bytes; the value is not trimmed.
pub fn validate_edit_value(value: &str) -> Result<(), FieldValidationError> {
    let chars = value.chars().count();
    if (EDIT_MIN_CHARS..=EDIT_MAX_CHARS).contains(&chars) {
        Ok(())
    } else {
        Err(FieldValidationError::InvalidLength { chars })
    }
}
