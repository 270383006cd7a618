//! Record sources: where meter rows come from before classification.
//!
//! The calculator never reaches for a shared client. A [`RecordSource`] is
//! handed to it, and every computation fetches fresh records through it.

mod cells;
pub mod csv;
pub mod filter;
pub mod json;

pub use self::csv::CsvSource;
pub use self::filter::{RecordFilter, distinct_meter_types, distinct_zones};
pub use self::json::JsonSource;

use crate::error::Result;
use crate::meter::{MeterRecord, MonthSchema};

/// Column holding the human-readable meter label.
pub const LABEL_COLUMN: &str = "Meter Label";
pub const ACCOUNT_COLUMN: &str = "Acct #";
/// Column holding the source's own level tag. Informational only.
pub const LEVEL_TAG_COLUMN: &str = "Label";
pub const ZONE_COLUMN: &str = "Zone";
pub const PARENT_COLUMN: &str = "Parent Meter";
pub const TYPE_COLUMN: &str = "Type";

/// Supplies the full record set for one computation.
///
/// Implementations validate rows at the boundary: readings for every key in
/// `months` are either numbers or blank by the time they are returned.
pub trait RecordSource {
    /// Fetches every available record.
    ///
    /// # Errors
    ///
    /// Returns an error when the fetch itself fails. An empty result is not
    /// an error here; the aggregator reports it as no data.
    fn fetch(&self, months: &MonthSchema) -> Result<Vec<MeterRecord>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch(&self, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
        (**self).fetch(months)
    }
}

/// Records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<MeterRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<MeterRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for InMemorySource {
    fn fetch(&self, _months: &MonthSchema) -> Result<Vec<MeterRecord>> {
        Ok(self.records.clone())
    }
}

/// Adapts a closure into a record source.
///
/// # Examples
///
/// ```
/// use water_kpi::meter::{MeterRecord, MonthSchema};
/// use water_kpi::source::{FnSource, RecordSource};
///
/// let source = FnSource::new(|_| Ok(vec![MeterRecord::new("Z5-17", "Residential (Villa)")]));
/// let records = source.fetch(&MonthSchema::default()).unwrap();
/// assert_eq!(records.len(), 1);
/// ```
pub struct FnSource<F>(F);

impl<F> FnSource<F>
where
    F: Fn(&MonthSchema) -> Result<Vec<MeterRecord>>,
{
    pub fn new(fetch: F) -> Self {
        Self(fetch)
    }
}

impl<F> RecordSource for FnSource<F>
where
    F: Fn(&MonthSchema) -> Result<Vec<MeterRecord>>,
{
    fn fetch(&self, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
        (self.0)(months)
    }
}
