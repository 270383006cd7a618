//! Error taxonomy for record loading and KPI computation.
//!
//! Only these conditions stop a computation from producing metrics. Data
//! quality anomalies are reported as [`crate::hierarchy::DataQualityWarning`]
//! values alongside a valid result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KpiError {
    /// The record source returned an empty record set.
    #[error("no meter records available")]
    NoData,

    /// The record source failed to deliver records.
    #[error("record source error: {0}")]
    Source(String),

    /// A configured month key has no matching column in the input.
    #[error("schema error: missing column `{0}`")]
    MissingColumn(String),

    /// A monthly cell held text that is neither a number nor a blank marker.
    #[error("row {row}: invalid reading `{value}` in column `{column}`")]
    InvalidReading {
        row: usize,
        column: String,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KpiError>;
