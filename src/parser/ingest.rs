use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::cell::Cell;
use super::record::{parse_current_row, parse_legacy_row, Field, RowOutcome, Skip, SkipReason};
use super::workbook::{read_first_sheet, Sheet};
use crate::dataset::{Dataset, District, School};
use crate::error::{IngestError, IngestResult};
use crate::schema::known_districts_by_id;

/// Sheets this wide or wider use the current layout
pub const CURRENT_MIN_COLUMNS: usize = 13;
/// Narrowest sheet still read as legacy (up to and including the site column)
pub const LEGACY_MIN_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Current,
    Legacy,
}

impl Layout {
    /// Decided once per file from the number of populated columns
    pub fn detect(columns: usize) -> Option<Self> {
        if columns >= CURRENT_MIN_COLUMNS {
            Some(Layout::Current)
        } else if columns >= LEGACY_MIN_COLUMNS {
            Some(Layout::Legacy)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Current => write!(f, "current"),
            Layout::Legacy => write!(f, "legacy"),
        }
    }
}

/// One skipped row, by its 1-based sheet row number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    pub row: usize,
    pub reason: SkipReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub layout: Layout,
    /// Non-blank data rows, header excluded
    pub rows_seen: usize,
    pub imported: usize,
    /// Legacy district rows
    pub district_rows: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub issues: Vec<RowIssue>,
}

impl IngestReport {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            rows_seen: 0,
            imported: 0,
            district_rows: 0,
            skipped: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    fn record_skip(&mut self, row: usize, skip: Skip) {
        *self.skipped.entry(skip.reason).or_default() += 1;
        self.issues.push(RowIssue {
            row,
            reason: skip.reason,
            field: skip.field,
        });
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} layout: {} schools imported from {} rows{}",
            self.layout,
            self.imported,
            self.rows_seen,
            if self.skipped_total() > 0 {
                format!(" ({} skipped)", self.skipped_total())
            } else {
                String::new()
            }
        )
    }
}

/// Output of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub dataset: Dataset,
    pub report: IngestReport,
}

/// State threaded through the data rows in file order
struct Fold {
    report: IngestReport,
    declared: Vec<District>,
    schools: Vec<School>,
    /// District opened by the latest legacy district row
    context: Option<String>,
}

impl Fold {
    fn new(layout: Layout) -> Self {
        Self {
            report: IngestReport::new(layout),
            declared: Vec::new(),
            schools: Vec::new(),
            context: None,
        }
    }

    fn step(mut self, row: usize, cells: &[Cell]) -> Self {
        self.report.rows_seen += 1;
        let outcome = match self.report.layout {
            Layout::Current => parse_current_row(cells),
            Layout::Legacy => parse_legacy_row(cells, self.context.as_deref()),
        };
        match outcome {
            RowOutcome::School(school) => {
                self.report.imported += 1;
                self.schools.push(school);
            }
            RowOutcome::District(district) => {
                self.report.district_rows += 1;
                self.context = Some(district.name.clone());
                self.declared.push(district);
            }
            RowOutcome::Skipped(skip) => self.report.record_skip(row, skip),
        }
        self
    }
}

/// Number of columns up to the rightmost filled cell in any row
fn populated_width(rows: &[Vec<Cell>]) -> usize {
    rows.iter()
        .filter_map(|row| row.iter().rposition(Cell::is_filled))
        .map(|idx| idx + 1)
        .max()
        .unwrap_or(0)
}

/// Parse rows whose first entry is the header row
pub fn ingest_rows(rows: &[Vec<Cell>]) -> IngestResult<Ingested> {
    ingest_rows_at(rows, 0)
}

/// `first_row` is the 0-based sheet row of `rows[0]`, used for row numbers in issues
fn ingest_rows_at(rows: &[Vec<Cell>], first_row: usize) -> IngestResult<Ingested> {
    // Data rows decide the layout, a header-only sheet falls back to the header
    let columns = match populated_width(rows.get(1..).unwrap_or_default()) {
        0 => populated_width(rows),
        width => width,
    };
    let layout = Layout::detect(columns).ok_or(IngestError::UnrecognizedLayout { columns })?;

    let fold = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, cells)| cells.iter().any(Cell::is_filled))
        .fold(Fold::new(layout), |fold, (idx, cells)| {
            fold.step(first_row + idx + 1, cells)
        });

    let Fold {
        report,
        declared,
        schools,
        ..
    } = fold;

    for issue in &report.issues {
        log::debug!("row {} skipped: {} ({:?})", issue.row, issue.reason, issue.field);
    }

    if report.imported == 0 {
        return Err(IngestError::NothingImported {
            report: Box::new(report),
        });
    }

    log::info!("{}", report.summary());

    Ok(Ingested {
        dataset: Dataset {
            districts: aggregate(&declared, &schools),
            schools,
        },
        report,
    })
}

pub fn ingest_sheet(sheet: &Sheet) -> IngestResult<Ingested> {
    ingest_rows_at(&sheet.rows, sheet.first_row)
}

/// Parse raw `.xlsx` bytes
pub fn ingest_bytes(bytes: &[u8]) -> IngestResult<Ingested> {
    let sheet = read_first_sheet(bytes)?;
    ingest_sheet(&sheet)
}

pub fn ingest_file(path: &Path) -> IngestResult<Ingested> {
    let bytes = std::fs::read(path)?;
    ingest_bytes(&bytes)
}

/// One district per known district, sorted by id.
///
/// A count is the sum over the district's schools whenever at least one school
/// states it. Otherwise the legacy district row's own figure is used, and a
/// district with no schools and no district row counts zero.
fn aggregate(declared: &[District], schools: &[School]) -> Vec<District> {
    known_districts_by_id()
        .into_iter()
        .map(|(id, known)| {
            let own: Vec<&School> = schools.iter().filter(|s| s.district == known.name).collect();
            let stated = declared.iter().rev().find(|d| d.name == known.name);
            let fallback = |field: fn(&District) -> Option<u64>| match stated {
                Some(d) => field(d),
                None if own.is_empty() => Some(0),
                None => None,
            };

            District {
                id: Some(id),
                name: known.name.to_string(),
                students: sum_present(&own, |s| s.students).or_else(|| fallback(|d| d.students)),
                teachers: sum_present(&own, |s| s.teachers).or_else(|| fallback(|d| d.teachers)),
                workers: sum_present(&own, |s| s.workers).or_else(|| fallback(|d| d.workers)),
            }
        })
        .collect()
}

fn sum_present(schools: &[&School], field: impl Fn(&School) -> Option<u64>) -> Option<u64> {
    schools
        .iter()
        .filter_map(|s| field(*s))
        .reduce(|a, b| a.saturating_add(b))
}
