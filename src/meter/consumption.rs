//! Monthly consumption aggregation for a single meter.

use super::types::MeterRecord;

/// Sums a record's readings over `months`, in the given order.
///
/// Blank and missing months count as zero. Negative readings are meter
/// correction entries and are summed as they are.
///
/// # Examples
///
/// ```
/// use water_kpi::meter::{MeterRecord, total_consumption};
///
/// let record = MeterRecord::new("Z3-42 (Villa)", "Residential (Villa)")
///     .with_reading("Jan-25", Some(50.0))
///     .with_reading("Feb-25", None);
/// assert_eq!(total_consumption(&record, &["Jan-25", "Feb-25", "Mar-25"]), 50.0);
/// ```
pub fn total_consumption<K: AsRef<str>>(record: &MeterRecord, months: &[K]) -> f64 {
    months
        .iter()
        .map(|month| record.reading(month.as_ref()).unwrap_or(0.0))
        .sum()
}

/// Per-month values for `months`, blanks as zero.
pub fn monthly_values<K: AsRef<str>>(record: &MeterRecord, months: &[K]) -> Vec<f64> {
    months
        .iter()
        .map(|month| record.reading(month.as_ref()).unwrap_or(0.0))
        .collect()
}
