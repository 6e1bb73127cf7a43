//! Minimal Office Open XML workbook writer and reader.
//!
//! The writer emits one worksheet with a shared-string table; every cell is
//! text. Reading goes through `calamine`.

use super::{ExportError, ExportResult, Table, TableSink};
use crate::model::layout::Layout;
use crate::model::record::TaskRecord;
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{error, info};
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the single exported worksheet.
pub const SHEET_NAME: &str = "Extracted Data";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

/// Writes the active layout's columns to a single-sheet workbook.
#[derive(Debug, Clone, Copy)]
pub struct XlsxTableWriter {
    layout: Layout,
}

impl XlsxTableWriter {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn write_workbook(&self, records: &[TaskRecord], path: &Path) -> ExportResult<()> {
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut strings = SharedStrings::default();
        let header = self
            .layout
            .headers()
            .into_iter()
            .map(|heading| strings.index_of(heading))
            .collect::<Vec<_>>();
        let mut rows = vec![header];
        for record in records {
            rows.push(
                self.layout
                    .row_values(record)
                    .into_iter()
                    .map(|value| strings.index_of(value))
                    .collect(),
            );
        }

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("xl/workbook.xml", workbook_xml()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
            ("xl/worksheets/sheet1.xml", sheet_xml(&rows)),
            ("xl/sharedStrings.xml", strings.to_xml()),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())
                .map_err(|source| ExportError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        let mut writer = zip.finish()?;
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

impl TableSink for XlsxTableWriter {
    fn write_table(&self, records: &[TaskRecord], path: &Path) -> ExportResult<usize> {
        let started_at = Instant::now();
        match self.write_workbook(records, path) {
            Ok(()) => {
                info!(
                    "event=table_export module=export status=ok layout={} rows={} duration_ms={}",
                    self.layout,
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records.len())
            }
            Err(err) => {
                error!(
                    "event=table_export module=export status=error layout={} duration_ms={} error={err}",
                    self.layout,
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

/// Reads the `Extracted Data` sheet of a workbook back into a [`Table`].
///
/// Rows shorter than the header are padded with empty cells.
pub fn read_table(path: impl AsRef<Path>) -> ExportResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    let range = workbook.worksheet_range(SHEET_NAME)?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let width = headers.len();
    let rows = rows
        .map(|mut row| {
            if row.len() < width {
                row.resize(width, String::new());
            }
            row
        })
        .collect();

    Ok(Table { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(value) => value.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Insertion-ordered shared-string table.
#[derive(Debug, Default)]
struct SharedStrings {
    values: Vec<String>,
    index: HashMap<String, usize>,
    references: usize,
}

impl SharedStrings {
    /// Index of `value` in the table; `None` for empty cells.
    fn index_of(&mut self, value: &str) -> Option<usize> {
        let value = xml_safe(value);
        if value.is_empty() {
            return None;
        }
        self.references += 1;
        if let Some(existing) = self.index.get(&value) {
            return Some(*existing);
        }
        let next = self.values.len();
        self.index.insert(value.clone(), next);
        self.values.push(value);
        Some(next)
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            "{XML_HEADER}\n<sst xmlns=\"{MAIN_NS}\" count=\"{}\" uniqueCount=\"{}\">",
            self.references,
            self.values.len()
        );
        for value in &self.values {
            xml.push_str("<si><t xml:space=\"preserve\">");
            xml.push_str(&escape(value.as_str()));
            xml.push_str("</t></si>");
        }
        xml.push_str("</sst>");
        xml
    }
}

fn workbook_xml() -> String {
    format!(
        "{XML_HEADER}\n<workbook xmlns=\"{MAIN_NS}\" xmlns:r=\"{REL_NS}\"><sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
        escape(SHEET_NAME)
    )
}

fn sheet_xml(rows: &[Vec<Option<usize>>]) -> String {
    let mut xml = format!("{XML_HEADER}\n<worksheet xmlns=\"{MAIN_NS}\"><sheetData>");
    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        xml.push_str(&format!("<row r=\"{row_number}\">"));
        for (column_index, cell) in row.iter().enumerate() {
            if let Some(string_index) = cell {
                xml.push_str(&format!(
                    "<c r=\"{}{row_number}\" t=\"s\"><v>{string_index}</v></c>",
                    column_name(column_index)
                ));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Spreadsheet column letters: 0 -> `A`, 25 -> `Z`, 26 -> `AA`.
fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Drops characters XML 1.0 cannot carry.
/// Drops characters XML 1.0 cannot carry: C0 controls other than tab, line
/// feed and carriage return, plus the two noncharacters U+FFFE and U+FFFF.
fn xml_safe(value: &str) -> String {
    value
        .chars()
        .filter(|ch| match ch {
            '\t' | '\n' | '\r' => true,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => false,
            _ => true,
        })
        .collect()
}
