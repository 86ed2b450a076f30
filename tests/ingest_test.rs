//! Spreadsheet ingestion through real `.xlsx` bytes.

mod support;

use schoolmap::parser::{ingest_bytes, read_first_sheet, Field, Layout, SkipReason};
use schoolmap::{Coords, IngestError};
use support::*;

#[test]
fn current_layout_workbook() {
    let ingested = ingest_bytes(&CURRENT_WORKBOOK).unwrap();
    let report = &ingested.report;

    assert_eq!(report.layout, Layout::Current);
    assert_eq!(report.rows_seen, 6);
    assert_eq!(report.imported, 3);
    assert_eq!(report.skipped_total(), 3);
    assert_eq!(report.skipped.get(&SkipReason::UnknownDistrict), Some(&1));
    assert_eq!(report.skipped.get(&SkipReason::MissingCell), Some(&1));
    assert_eq!(report.skipped.get(&SkipReason::InvalidNumber), Some(&1));

    let rows: Vec<usize> = report.issues.iter().map(|i| i.row).collect();
    assert_eq!(rows, vec![5, 6, 8]);
    assert_eq!(report.issues[1].field, Some(Field::Shift));
    assert_eq!(report.issues[2].field, Some(Field::Students));

    let school = &ingested.dataset.schools[0];
    assert_eq!(school.name, "Школа №1");
    assert_eq!(school.students, Some(640));
    assert_eq!(school.coords, Some(Coords(43.3175, 45.694)));
    assert_eq!(school.address.as_deref(), Some("ул. Мира, 1"));
    assert!(school.is_state);
    assert!(!ingested.dataset.schools[1].is_state);
}

#[test]
fn current_layout_aggregates() {
    let dataset = ingest_bytes(&CURRENT_WORKBOOK).unwrap().dataset;

    assert_eq!(dataset.districts.len(), 22);
    let ids: Vec<u32> = dataset.districts.iter().filter_map(|d| d.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    let grozny = dataset.district(1).unwrap();
    assert_eq!(grozny.name, GROZNY);
    assert_eq!(grozny.students, Some(1000));
    assert_eq!(grozny.teachers, Some(80));
    assert_eq!(grozny.workers, Some(70));

    let argun = dataset.district(2).unwrap();
    assert_eq!(argun.students, Some(410));

    let vedeno = dataset.district(4).unwrap();
    assert_eq!(vedeno.students, Some(0));
    assert_eq!(dataset.schools_in(4).unwrap().len(), 0);
}

#[test]
fn legacy_layout_workbook() {
    let ingested = ingest_bytes(&LEGACY_WORKBOOK).unwrap();
    let report = &ingested.report;

    assert_eq!(report.layout, Layout::Legacy);
    assert_eq!(report.rows_seen, 6);
    assert_eq!(report.district_rows, 2);
    assert_eq!(report.imported, 3);
    assert_eq!(report.skipped.get(&SkipReason::TotalRow), Some(&1));

    let schools = &ingested.dataset.schools;
    assert_eq!(schools[0].district, VEDENO);
    assert_eq!(schools[0].coords, Some(Coords(42.97, 46.10)));
    assert_eq!(schools[1].coords, Some(Coords(42.96, 46.11)));
    assert!(!schools[1].is_state);
    assert_eq!(schools[2].district, ARGUN);
    assert_eq!(schools[2].coords, None);
}

#[test]
fn legacy_school_counts_override_declared_counts() {
    let dataset = ingest_bytes(&LEGACY_WORKBOOK).unwrap().dataset;

    let vedeno = dataset.district(4).unwrap();
    assert_eq!(vedeno.students, Some(420));
    assert_eq!(vedeno.workers, Some(30));
    assert_eq!(vedeno.teachers, Some(40));

    let argun = dataset.district(2).unwrap();
    assert_eq!(argun.students, Some(650));

    assert_eq!(dataset.district(1).unwrap().students, Some(0));
}

#[test]
fn legacy_layout_with_extra_header_labels() {
    let mut rows = legacy_rows();
    rows[0].extend(["Примечание", "Ссылка"]);

    let ingested = ingest_bytes(&xlsx(&rows)).unwrap();
    assert_eq!(ingested.report.layout, Layout::Legacy);
    assert_eq!(ingested.report.imported, 3);
    assert_eq!(ingested, ingest_bytes(&LEGACY_WORKBOOK).unwrap());
}

#[test]
fn same_bytes_same_result() {
    let first = ingest_bytes(&LEGACY_WORKBOOK).unwrap();
    let second = ingest_bytes(&LEGACY_WORKBOOK).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sheet_reader_keeps_rows_in_order() {
    let sheet = read_first_sheet(&CURRENT_WORKBOOK).unwrap();
    assert_eq!(sheet.name, "Школы");
    assert_eq!(sheet.first_row, 0);
    assert_eq!(sheet.rows.len(), 8);
}

#[test]
fn rejects_non_workbook() {
    let err = ingest_bytes(b"PK but not really").unwrap_err();
    assert!(matches!(err, IngestError::NotAWorkbook(_)));
}

#[test]
fn rejects_narrow_sheet() {
    let bytes = xlsx(&[vec!["Школа", "Район"], vec!["A", GROZNY]]);
    let err = ingest_bytes(&bytes).unwrap_err();
    assert!(matches!(err, IngestError::UnrecognizedLayout { columns: 2 }));
}

#[test]
fn rejects_when_nothing_imported() {
    let err = ingest_bytes(&EMPTY_WORKBOOK).unwrap_err();
    let report = err.report().expect("report of the rejected parse");
    assert_eq!(report.rows_seen, 1);
    assert_eq!(report.imported, 0);
    assert_eq!(report.issues[0].reason, SkipReason::UnknownDistrict);
}

#[test]
fn rejects_header_only_sheet() {
    let err = ingest_bytes(&xlsx(&[current_header()])).unwrap_err();
    assert!(matches!(err, IngestError::NothingImported { .. }));
}
