//! Manual correction of extracted records.
//!
//! # Responsibility
//! - Apply length-validated cell edits to one run's records.
//! - Hand each accepted row to the persistence port given at construction.
//!
//! # Invariants
//! - A rejected edit leaves the record unchanged.
//! - A port failure never reverts an accepted edit.

use crate::model::layout::{Column, Layout};
use crate::model::record::{validate_edit_value, FieldValidationError, TaskRecord};
use crate::repo::record_repo::{RecordSink, RepoError, RepoResult, SqliteRecordRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::slice;

/// Persistence port for accepted edits.
pub trait EditPort {
    fn persist_edit(&self, layout: Layout, record: &TaskRecord) -> RepoResult<()>;
}

impl<F> EditPort for F
where
    F: Fn(Layout, &TaskRecord) -> RepoResult<()>,
{
    fn persist_edit(&self, layout: Layout, record: &TaskRecord) -> RepoResult<()> {
        self(layout, record)
    }
}

/// Stored rows are append-only, so an edited row is appended as a new row.
impl EditPort for SqliteRecordRepository<'_> {
    fn persist_edit(&self, layout: Layout, record: &TaskRecord) -> RepoResult<()> {
        self.append(layout, slice::from_ref(record)).map(|_| ())
    }
}

#[derive(Debug)]
pub enum EditError {
    RowOutOfRange { row: usize, rows: usize },
    ColumnNotInLayout { column: Column, layout: Layout },
    InvalidLength(FieldValidationError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowOutOfRange { row, rows } => {
                write!(f, "row {row} out of range ({rows} rows)")
            }
            Self::ColumnNotInLayout { column, layout } => {
                write!(f, "column `{column}` is not part of layout `{layout}`")
            }
            Self::InvalidLength(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLength(err) => Some(err),
            Self::RowOutOfRange { .. } | Self::ColumnNotInLayout { .. } => None,
        }
    }
}

impl From<FieldValidationError> for EditError {
    fn from(value: FieldValidationError) -> Self {
        Self::InvalidLength(value)
    }
}

/// Accepted edit.
#[derive(Debug)]
pub struct EditOutcome {
    /// Cell value before the edit.
    pub previous: String,
    /// Set when the port failed to persist the edited row.
    pub persist_error: Option<RepoError>,
}

/// Editable view over one run's records.
pub struct RecordEditor<P: EditPort> {
    layout: Layout,
    records: Vec<TaskRecord>,
    port: P,
}

impl<P: EditPort> RecordEditor<P> {
    pub fn new(layout: Layout, records: Vec<TaskRecord>, port: P) -> Self {
        Self {
            layout,
            records,
            port,
        }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TaskRecord> {
        self.records
    }

    /// Replaces one cell and persists the full row.
    ///
    /// # Errors
    /// - `RowOutOfRange` / `ColumnNotInLayout` for an unknown target.
    /// - `InvalidLength` when `value` is outside the accepted length; a
    ///   warning is logged and the record keeps its value.
    pub fn apply_edit(
        &mut self,
        row: usize,
        column: Column,
        value: &str,
    ) -> Result<EditOutcome, EditError> {
        let rows = self.records.len();
        let layout = self.layout;
        let record = self
            .records
            .get_mut(row)
            .ok_or(EditError::RowOutOfRange { row, rows })?;
        if !layout.has_column(column) {
            return Err(EditError::ColumnNotInLayout { column, layout });
        }
        if let Err(err) = validate_edit_value(value) {
            warn!(
                "event=record_edit module=service status=error row={row} column={} error={err}",
                column.display_name()
            );
            return Err(err.into());
        }

        let previous = std::mem::replace(column.value_mut(record), value.to_string());
        let persist_error = self.port.persist_edit(layout, record).err();
        match &persist_error {
            None => info!(
                "event=record_edit module=service status=ok row={row} column={}",
                column.display_name()
            ),
            Some(err) => warn!(
                "event=record_edit module=service status=error row={row} column={} error_code=persist_failed error={err}",
                column.display_name()
            ),
        }

        Ok(EditOutcome {
            previous,
            persist_error,
        })
    }
}
