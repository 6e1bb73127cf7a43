use taskscan_core::export::SHEET_NAME;
use taskscan_core::{read_table, Layout, Pipeline, TableSink, TaskRecord, XlsxTableWriter};

#[test]
fn exported_workbook_reads_back_in_layout_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.xlsx");

    let page = "21/51/10/601/001/001 Check oil level ALL MP/N 579045 60 M MET 21.51.10.601\n\
                32/11/00/210/801/001 Inspect gear 2928-2 (A1) 12 M";
    let records = Pipeline::for_layout(Layout::Tdmplmd)
        .extract_pages(&[page])
        .records;
    let written = XlsxTableWriter::new(Layout::Tdmplmd)
        .write_table(&records, &path)
        .unwrap();
    assert_eq!(written, records.len());

    let table = read_table(&path).unwrap();
    assert_eq!(table.headers, Layout::Tdmplmd.headers());
    assert_eq!(table.rows.len(), records.len());
    for (row, record) in table.rows.iter().zip(&records) {
        assert_eq!(row, &Layout::Tdmplmd.row_values(record));
    }
    assert_eq!(table.rows[0][3], "ALL MP/N");
}

#[test]
fn empty_batch_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    XlsxTableWriter::new(Layout::Tddm)
        .write_table(&[], &path)
        .unwrap();

    let table = read_table(&path).unwrap();
    assert_eq!(
        table.headers,
        vec!["ATA", "Task Number", "Description", "Documentation", "Margin", "Reference"]
    );
    assert!(table.rows.is_empty());
}

#[test]
fn markup_and_c1_characters_survive_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markup.xlsx");

    let mut record = TaskRecord::new("21/51/10/601/001/001", "A < B & \"C\"");
    record.description = "Check <valve> & seal".to_string();
    record.margin = "c1\u{85}x".to_string();
    XlsxTableWriter::new(Layout::Tddm)
        .write_table(&[record], &path)
        .unwrap();

    let table = read_table(&path).unwrap();
    assert_eq!(table.rows[0][2], "Check <valve> & seal");
    assert_eq!(table.rows[0][4], "c1\u{85}x");
    assert_eq!(table.rows[0][5], "A < B & \"C\"");
}

#[test]
fn workbook_exposes_the_extracted_data_sheet() {
    use calamine::{open_workbook, Reader, Xlsx};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.xlsx");
    XlsxTableWriter::new(Layout::Tddim)
        .write_table(&[], &path)
        .unwrap();

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tasks.xlsx");

    let err = XlsxTableWriter::new(Layout::Tddm)
        .write_table(&[], &path)
        .unwrap_err();
    assert!(err.to_string().contains("tasks.xlsx"));
}
