//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::hierarchy::{DataQualityWarning, KpiRatings, WaterKpiMetrics};

/// Headline metrics with their ratings and data-quality warnings.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Month schema version the metrics were summed over.
    pub month_schema_version: u32,
    pub record_count: usize,
    pub metrics: WaterKpiMetrics,
    pub ratings: KpiRatings,
    pub warnings: Vec<DataQualityWarning>,
    /// Distinct zones available for filtering.
    pub zones: Vec<String>,
    /// Distinct meter types available for filtering.
    pub meter_types: Vec<String>,
}

/// Optional range query parameters for the monthly endpoint.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// First month index (inclusive, 0-based).
    pub from: Option<usize>,
    /// Last month index (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
