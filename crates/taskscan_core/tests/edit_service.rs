use taskscan_core::db::open_db_in_memory;
use taskscan_core::{Column, EditError, Layout, Pipeline, RecordEditor, SqliteRecordRepository};

const LINE: &str = "21/51/10/601/001/001 Check oil level ALL MP/N 579045 60 M MET 21.51.10.601";

#[test]
fn accepted_edit_appends_the_corrected_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let records = Pipeline::for_layout(Layout::Tdmplmd)
        .extract_pages(&[LINE])
        .records;
    let mut editor = RecordEditor::new(Layout::Tdmplmd, records, SqliteRecordRepository::new(&conn));

    let outcome = editor.apply_edit(0, Column::Limit, "72 M").unwrap();
    assert_eq!(outcome.previous, "60 M");
    assert!(outcome.persist_error.is_none());
    assert_eq!(editor.records()[0].limit, "72 M");

    let rows = repo.list_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("time_limit"), Some("72 M"));
    assert_eq!(rows[0].get("task_number"), Some("21/51/10/601/001/001"));
}

#[test]
fn rejected_edits_leave_the_record_alone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let records = Pipeline::for_layout(Layout::Tdmplmd)
        .extract_pages(&[LINE])
        .records;
    let mut editor = RecordEditor::new(Layout::Tdmplmd, records, SqliteRecordRepository::new(&conn));

    assert!(matches!(
        editor.apply_edit(0, Column::Margin, "1 D"),
        Ok(_)
    ));
    assert!(matches!(
        editor.apply_edit(0, Column::Margin, "1D"),
        Err(EditError::InvalidLength(_))
    ));
    assert!(matches!(
        editor.apply_edit(0, Column::Interval, "12 M"),
        Err(EditError::ColumnNotInLayout { .. })
    ));
    assert!(matches!(
        editor.apply_edit(3, Column::Margin, "12 M"),
        Err(EditError::RowOutOfRange { row: 3, rows: 1 })
    ));

    assert_eq!(editor.records()[0].margin, "1 D");
    assert_eq!(repo.count().unwrap(), 1);
}
