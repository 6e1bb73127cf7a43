//! Spreadsheet export of extracted records.
//!
//! # Responsibility
//! - Define the table sink contract used by extraction runs.
//! - Write and read back single-sheet `.xlsx` workbooks.
//!
//! # Invariants
//! - Exported columns are exactly the active layout's columns, in order,
//!   under one header row.

use crate::model::record::TaskRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod xlsx;

pub use xlsx::{read_table, XlsxTableWriter, SHEET_NAME};

pub type ExportResult<T> = Result<T, ExportError>;

/// Export and read-back errors.
#[derive(Debug)]
pub enum ExportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Archive(zip::result::ZipError),
    Read(calamine::XlsxError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::Archive(err) => write!(f, "workbook archive error: {err}"),
            Self::Read(err) => write!(f, "cannot read workbook: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Archive(err) => Some(err),
            Self::Read(err) => Some(err),
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value)
    }
}

impl From<calamine::XlsxError> for ExportError {
    fn from(value: calamine::XlsxError) -> Self {
        Self::Read(value)
    }
}

/// Header row plus data rows read back from a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Destination for one run's tabular export.
pub trait TableSink {
    /// Writes `records` to `path` and returns the number of data rows.
    fn write_table(&self, records: &[TaskRecord], path: &Path) -> ExportResult<usize>;
}
