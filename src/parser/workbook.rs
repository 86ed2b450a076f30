use calamine::{Reader, Xlsx};
use std::io::Cursor;
use zip::ZipArchive;

use super::cell::Cell;
use crate::error::{IngestError, IngestResult};

/// Part every SpreadsheetML package carries
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// The first worksheet of a workbook as plain rows
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// 0-based sheet row of `rows[0]`
    pub first_row: usize,
    /// Column A is always index 0, leading empty columns are kept as `Cell::Empty`
    pub rows: Vec<Vec<Cell>>,
}

/// Check that the bytes are a zip package holding a workbook part
pub fn check_container(bytes: &[u8]) -> IngestResult<()> {
    let archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::not_a_workbook(format!("not a zip container ({})", e)))?;

    if !archive.file_names().any(|name| name == WORKBOOK_PART) {
        return Err(IngestError::not_a_workbook(format!("missing {}", WORKBOOK_PART)));
    }

    Ok(())
}

/// Read the first worksheet of an `.xlsx` file
pub fn read_first_sheet(bytes: &[u8]) -> IngestResult<Sheet> {
    check_container(bytes)?;

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| IngestError::not_a_workbook(e.to_string()))?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| IngestError::not_a_workbook(format!("sheet '{}': {}", name, e)))?;

    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let rows = range
        .rows()
        .map(|row| {
            std::iter::repeat(Cell::Empty)
                .take(first_col)
                .chain(row.iter().map(Cell::from))
                .collect::<Vec<Cell>>()
        })
        .collect();

    Ok(Sheet {
        name,
        first_row,
        rows,
    })
}
