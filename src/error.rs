use thiserror::Error;

use crate::parser::IngestReport;

/// Reasons a whole upload is rejected. Nothing is persisted in any of these cases.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an .xlsx workbook: {0}")]
    NotAWorkbook(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("sheet layout not recognized ({columns} populated columns)")]
    UnrecognizedLayout { columns: usize },

    #[error("no schools imported: all {} data rows were skipped", .report.rows_seen)]
    NothingImported { report: Box<IngestReport> },
}

impl IngestError {
    pub fn not_a_workbook(msg: impl Into<String>) -> Self {
        Self::NotAWorkbook(msg.into())
    }

    /// The report of the rejected parse, when rows were read at all
    pub fn report(&self) -> Option<&IngestReport> {
        match self {
            Self::NothingImported { report } => Some(report),
            _ => None,
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
