use std::path::PathBuf;

use thiserror::Error;

use super::model::EmployeeId;

// ---------------------------------------------------------------------------
// Load-time errors
// ---------------------------------------------------------------------------

/// The source could not be turned into an [`EmployeeTable`](super::model::EmployeeTable).
///
/// Always fatal for the load: no partial table is ever returned.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: empty value in required column '{column}'")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("duplicate EmployeeID '{0}'")]
    DuplicateEmployeeId(EmployeeId),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed JSON: {0}")]
    JsonShape(String),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed parquet: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}

// ---------------------------------------------------------------------------
// Aggregation-time errors
// ---------------------------------------------------------------------------

/// A `Hire Date` value that does not follow the day-first convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("employee {employee_id}: cannot parse hire date '{value}' as day-first")]
pub struct DateParseError {
    pub employee_id: EmployeeId,
    pub value: String,
}
