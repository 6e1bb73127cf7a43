//! Extraction run orchestration.
//!
//! # Responsibility
//! - Read every page from a source, extract one batch of records and hand
//!   the batch to each configured sink.
//!
//! # Invariants
//! - An unreadable source aborts the run before any sink is touched.
//! - Sinks are independent: a failing sink is reported, never fatal, and
//!   does not stop the others.

use crate::config::ExtractorConfig;
use crate::export::{ExportError, TableSink};
use crate::extract::pipeline::{ExtractionStats, Pipeline};
use crate::model::layout::Layout;
use crate::model::record::TaskRecord;
use crate::repo::record_repo::{RecordSink, RepoError};
use crate::source::{PageSource, SourceError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Which sink an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Records,
    Table,
}

impl SinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Table => "table",
        }
    }
}

/// Failure of one sink during a run.
#[derive(Debug)]
pub enum SinkError {
    Records(RepoError),
    Table(ExportError),
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Records(err) => write!(f, "record sink failed: {err}"),
            Self::Table(err) => write!(f, "table sink failed: {err}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Records(err) => Some(err),
            Self::Table(err) => Some(err),
        }
    }
}

/// Result of dispatching the batch to one sink.
#[derive(Debug)]
pub struct SinkOutcome {
    pub kind: SinkKind,
    /// Rows written, or the sink's error.
    pub result: Result<usize, SinkError>,
}

/// Sinks that receive a run's batch.
#[derive(Default)]
pub struct SinkSet<'a> {
    records: Option<&'a dyn RecordSink>,
    table: Option<(&'a dyn TableSink, PathBuf)>,
}

impl<'a> SinkSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, sink: &'a dyn RecordSink) -> Self {
        self.records = Some(sink);
        self
    }

    pub fn with_table(mut self, sink: &'a dyn TableSink, path: impl AsRef<Path>) -> Self {
        self.table = Some((sink, path.as_ref().to_path_buf()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_none() && self.table.is_none()
    }
}

/// Everything one run produced.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub layout: Layout,
    pub records: Vec<TaskRecord>,
    pub stats: ExtractionStats,
    pub sinks: Vec<SinkOutcome>,
    pub duration: Duration,
}

impl RunReport {
    pub fn all_sinks_ok(&self) -> bool {
        self.sinks.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Use-case service running one extraction per call.
#[derive(Debug, Clone)]
pub struct ExtractionService {
    pipeline: Pipeline,
}

impl ExtractionService {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            pipeline: Pipeline::new(config),
        }
    }

    pub fn layout(&self) -> Layout {
        self.pipeline.layout()
    }

    /// Runs one extraction with a fresh registry and dispatches the batch.
    ///
    /// # Errors
    /// - Returns [`SourceError`] when the source cannot be read. Sink
    ///   failures are reported in [`RunReport::sinks`] instead.
    pub fn run(
        &self,
        source: &dyn PageSource,
        sinks: &SinkSet<'_>,
    ) -> Result<RunReport, SourceError> {
        let started_at = Instant::now();
        let run_id = Uuid::new_v4();
        let layout = self.pipeline.layout();
        info!(
            "event=run_start module=pipeline status=start run_id={run_id} layout={layout} source={}",
            source.describe()
        );

        let pages = source.pages().map_err(|err| {
            error!(
                "event=run_done module=pipeline status=error run_id={run_id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            err
        })?;

        let extraction = self.pipeline.extract_pages(&pages);
        let records = extraction.records;
        let stats = extraction.stats;

        let mut outcomes = Vec::new();
        if let Some(sink) = sinks.records {
            let result = sink.append(layout, &records).map_err(SinkError::Records);
            outcomes.push(log_outcome(run_id, SinkKind::Records, result));
        }
        if let Some((sink, path)) = &sinks.table {
            let result = sink.write_table(&records, path).map_err(SinkError::Table);
            outcomes.push(log_outcome(run_id, SinkKind::Table, result));
        }

        let duration = started_at.elapsed();
        info!(
            "event=run_done module=pipeline status=ok run_id={run_id} layout={layout} pages={} anchors={} records={} duration_ms={}",
            stats.pages,
            stats.anchors,
            stats.records,
            duration.as_millis()
        );

        Ok(RunReport {
            run_id,
            layout,
            records,
            stats,
            sinks: outcomes,
            duration,
        })
    }
}

fn log_outcome(run_id: Uuid, kind: SinkKind, result: Result<usize, SinkError>) -> SinkOutcome {
    if let Err(err) = &result {
        error!(
            "event=sink_failed module=pipeline status=error run_id={run_id} sink={} error={err}",
            kind.as_str()
        );
    }
    SinkOutcome { kind, result }
}

#[cfg(test)]
mod tests {
    use super::{ExtractionService, SinkKind, SinkSet};
    use crate::config::ExtractorConfig;
    use crate::model::layout::Layout;
    use crate::model::record::TaskRecord;
    use crate::repo::record_repo::{RecordSink, RepoError, RepoResult};
    use crate::source::TextPages;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemorySink {
        batches: RefCell<Vec<usize>>,
    }

    impl RecordSink for MemorySink {
        fn append(&self, _layout: Layout, records: &[TaskRecord]) -> RepoResult<usize> {
            self.batches.borrow_mut().push(records.len());
            Ok(records.len())
        }
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn append(&self, _layout: Layout, _records: &[TaskRecord]) -> RepoResult<usize> {
            Err(RepoError::UnknownColumn("offline".to_string()))
        }
    }

    #[test]
    fn run_dispatches_one_batch() {
        let service = ExtractionService::new(&ExtractorConfig::for_layout(Layout::Tdmplm));
        let sink = MemorySink::default();
        let source = TextPages::from_pages([
            "21/51/10/601/001/001 Check oil 2928-2 (A) 17149-1 (B)",
            "no anchor here",
        ]);

        let report = service
            .run(&source, &SinkSet::new().with_records(&sink))
            .unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(*sink.batches.borrow(), vec![2]);
        assert!(report.all_sinks_ok());
        assert_eq!(report.stats.pages, 2);
    }

    #[test]
    fn failing_sink_is_reported_not_fatal() {
        let service = ExtractionService::new(&ExtractorConfig::default());
        let report = service
            .run(
                &TextPages::from_pages(["21/51/10/601/001/001 Check"]),
                &SinkSet::new().with_records(&FailingSink),
            )
            .unwrap();
        assert_eq!(report.records.len(), 1);
        assert!(!report.all_sinks_ok());
        assert_eq!(report.sinks[0].kind, SinkKind::Records);
    }

    #[test]
    fn unreadable_source_aborts_the_run() {
        let service = ExtractionService::new(&ExtractorConfig::default());
        let sink = MemorySink::default();
        let result = service.run(
            &TextPages::from_file("/definitely/not/here.txt"),
            &SinkSet::new().with_records(&sink),
        );
        assert!(result.is_err());
        assert!(sink.batches.borrow().is_empty());
    }
}
