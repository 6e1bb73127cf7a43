//! Core of taskscan: maintenance-task extraction from manual text.
//!
//! Pages of text go through a layout-specific extraction pipeline; the
//! resulting task records are appended to SQLite and exported to `.xlsx`.

pub mod config;
pub mod db;
pub mod export;
pub mod extract;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;

pub use config::{ConfigError, ExtractorConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use export::{read_table, ExportError, Table, TableSink, XlsxTableWriter};
pub use extract::pipeline::{Extraction, ExtractionStats, Pipeline};
pub use extract::registry::{CanonicalRegistry, FieldKind};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::layout::{Column, Layout, UnknownLayout};
pub use model::record::TaskRecord;
pub use repo::record_repo::{RecordSink, RepoError, RepoResult, SqliteRecordRepository};
pub use service::edit_service::{EditError, EditOutcome, EditPort, RecordEditor};
pub use service::extraction_service::{
    ExtractionService, RunReport, SinkError, SinkKind, SinkOutcome, SinkSet,
};
pub use source::{PageSource, SourceError, TextPages};

#[cfg(feature = "pdf")]
pub use source::PdfPages;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
