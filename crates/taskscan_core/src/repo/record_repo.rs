//! Task record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Append extracted batches to the fixed nine-column `task_records` table.
//! - Serve autocomplete suggestions from previously stored values.
//!
//! # Invariants
//! - A batch is appended in one transaction: all rows or none.
//! - Column names only ever reach SQL through the static mapping table.
//! - Storage columns a layout does not carry are written as `"-"`.

use crate::db::DbError;
use crate::model::layout::{Column, Layout};
use crate::model::record::{TaskRecord, PLACEHOLDER};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Storage columns in table order.
pub const STORAGE_COLUMNS: [&str; 9] = [
    "ata",
    "task_number",
    "description",
    "mpn",
    "pn",
    "time_limit",
    "lir_type",
    "margin",
    "reference",
];

/// Display heading to storage column.
const DISPLAY_TO_STORAGE: &[(&str, &str)] = &[
    ("ATA", "ata"),
    ("Task Number", "task_number"),
    ("Description", "description"),
    ("MP/N", "mpn"),
    ("PN", "pn"),
    ("Limit", "time_limit"),
    ("Interval", "time_limit"),
    ("Type of LIR", "lir_type"),
    ("Margin", "margin"),
    ("Reference", "reference"),
];

/// Suggestions returned when the caller gives no limit.
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 5;

const INSERT_SQL: &str = "INSERT INTO task_records (
    ata,
    task_number,
    description,
    mpn,
    pn,
    time_limit,
    lir_type,
    margin,
    reference
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);";

const SELECT_SQL: &str = "SELECT
    id,
    ata,
    task_number,
    description,
    mpn,
    pn,
    time_limit,
    lir_type,
    margin,
    reference
FROM task_records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Column name that is neither a display heading nor a storage column.
    UnknownColumn(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownColumn(name) => write!(f, "unknown column `{name}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UnknownColumn(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Resolves a display heading (`"MP/N"`) or storage name (`"mpn"`) to the
/// storage column.
pub fn storage_column(name: &str) -> Option<&'static str> {
    let name = name.trim();
    DISPLAY_TO_STORAGE
        .iter()
        .find(|(display, _)| *display == name)
        .map(|(_, storage)| *storage)
        .or_else(|| STORAGE_COLUMNS.iter().copied().find(|storage| *storage == name))
}

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: i64,
    /// Values in [`STORAGE_COLUMNS`] order.
    pub values: [String; 9],
}

impl StoredRow {
    /// Value of a storage column.
    pub fn get(&self, column: &str) -> Option<&str> {
        STORAGE_COLUMNS
            .iter()
            .position(|storage| *storage == column)
            .map(|index| self.values[index].as_str())
    }
}

/// Projects `record` onto the storage columns for `layout`.
pub fn storage_values(layout: Layout, record: &TaskRecord) -> [String; 9] {
    STORAGE_COLUMNS.map(|storage| {
        DISPLAY_TO_STORAGE
            .iter()
            .filter(|(_, target)| *target == storage)
            .filter_map(|(display, _)| Column::from_display_name(display))
            .find(|column| layout.has_column(*column))
            .map_or_else(|| PLACEHOLDER.to_string(), |column| column.value(record).to_string())
    })
}

/// Destination for one run's record batch.
pub trait RecordSink {
    /// Appends `records` as one batch and returns the number of rows written.
    fn append(&self, layout: Layout, records: &[TaskRecord]) -> RepoResult<usize>;
}

/// SQLite-backed task record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Distinct non-empty prior values of `column` containing `partial`, in
    /// order of first appearance.
    pub fn suggest(&self, column: &str, partial: &str, limit: u32) -> RepoResult<Vec<String>> {
        let storage =
            storage_column(column).ok_or_else(|| RepoError::UnknownColumn(column.to_string()))?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {storage} FROM task_records
             WHERE {storage} LIKE ?1 ESCAPE '\\' AND {storage} <> ''
             GROUP BY {storage}
             ORDER BY MIN(id) ASC
             LIMIT ?2;"
        );
        let pattern = format!("%{}%", escape_like(partial));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, limit], |row| row.get::<_, String>(0))?;

        let mut values = Vec::new();
        for value in rows {
            values.push(value?);
        }
        Ok(values)
    }

    /// Every stored row in insertion order.
    pub fn list_rows(&self) -> RepoResult<Vec<StoredRow>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_stored_row)?;

        let mut stored = Vec::new();
        for row in rows {
            stored.push(row?);
        }
        Ok(stored)
    }

    pub fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM task_records;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn insert_batch(&self, layout: Layout, records: &[TaskRecord]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_SQL)?;
            for record in records {
                let [ata, task_number, description, mpn, pn, time_limit, lir_type, margin, reference] =
                    storage_values(layout, record);
                stmt.execute(params![
                    ata,
                    task_number,
                    description,
                    mpn,
                    pn,
                    time_limit,
                    lir_type,
                    margin,
                    reference
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }
}

impl RecordSink for SqliteRecordRepository<'_> {
    fn append(&self, layout: Layout, records: &[TaskRecord]) -> RepoResult<usize> {
        let started_at = Instant::now();
        match self.insert_batch(layout, records) {
            Ok(rows) => {
                info!(
                    "event=records_append module=repo status=ok layout={layout} rows={rows} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(rows)
            }
            Err(err) => {
                error!(
                    "event=records_append module=repo status=error layout={layout} rows={} duration_ms={} error={err}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

fn parse_stored_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        values: [
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
            row.get(8)?,
            row.get(9)?,
        ],
    })
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, storage_column, storage_values};
    use crate::model::layout::Layout;
    use crate::model::record::TaskRecord;

    #[test]
    fn storage_column_accepts_display_and_storage_names() {
        assert_eq!(storage_column("MP/N"), Some("mpn"));
        assert_eq!(storage_column("Interval"), Some("time_limit"));
        assert_eq!(storage_column("Type of LIR"), Some("lir_type"));
        assert_eq!(storage_column("reference"), Some("reference"));
        assert_eq!(storage_column("Documentation"), None);
        assert_eq!(storage_column("ata; DROP TABLE task_records"), None);
    }

    #[test]
    fn storage_values_default_missing_columns() {
        let mut record = TaskRecord::new("21/51/10/601/001/001", "ctx");
        record.ata = "21-51".to_string();
        record.part_number = "2928-2".to_string();
        record.limit = "12 M".to_string();

        let tddm = storage_values(Layout::Tddm, &record);
        assert_eq!(tddm[0], "21-51");
        assert_eq!(tddm[3], "-");
        assert_eq!(tddm[5], "-");
        assert_eq!(tddm[6], "-");
        assert_eq!(tddm[7], "0");

        let tddim = storage_values(Layout::Tddim, &record);
        assert_eq!(tddim[5], "12 M");

        let tdmplm = storage_values(Layout::Tdmplm, &record);
        assert_eq!(tdmplm[3], "2928-2");
        assert_eq!(tdmplm[8], "ctx");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
