//! Persistence of the imported dataset.
//!
//! The live data is a SQLite database plus the workbook it was built from,
//! both kept in a [`DataDir`]. Imports write staging copies and rename them
//! into place, the server keeps the loaded copy in a [`Snapshot`].

pub mod data_dir;
pub mod schema_gen;
pub mod snapshot;
pub mod sqlite;

pub use data_dir::*;
pub use snapshot::*;
pub use sqlite::{commit, load_dataset, write_dataset, SqlValue, SqliteWriter};

use anyhow::Result;

use crate::dataset::Dataset;
use crate::parser::{ingest_bytes, Ingested};
use crate::ui::{Phase, Ui};

/// Parse a workbook and, if it yields schools, make it the live data.
///
/// A rejected workbook leaves the data directory untouched; the returned
/// error downcasts to [`crate::error::IngestError`].
pub fn import_workbook(data_dir: &DataDir, bytes: &[u8], ui: &mut impl Ui) -> Result<Ingested> {
    ui.set_phase(Phase::Reading);
    ui.set_info(format!("{} byte workbook", bytes.len()));

    ui.set_phase(Phase::Parsing);
    let ingested = match ingest_bytes(bytes) {
        Ok(ingested) => ingested,
        Err(e) => {
            if let Some(report) = e.report() {
                for issue in &report.issues {
                    ui.row_skipped(issue.row, issue.reason);
                }
            }
            return Err(e.into());
        }
    };

    for issue in &ingested.report.issues {
        ui.row_skipped(issue.row, issue.reason);
    }
    ui.set_info(ingested.report.summary());

    ui.set_phase(Phase::Writing);
    let rows = commit(data_dir, &ingested.dataset, Some(bytes), ui)?;
    ui.clear_progress();
    ui.log(format!("{} rows written to {:?}", rows, data_dir.database_path()));

    ui.set_phase(Phase::Complete);
    log::info!("data in {:?} replaced", data_dir.root());

    Ok(ingested)
}

/// Load the live dataset if one has been imported
pub fn load_current(data_dir: &DataDir) -> Result<Option<Dataset>> {
    if !data_dir.has_data() {
        return Ok(None);
    }
    load_dataset(&data_dir.database_path()).map(Some)
}
