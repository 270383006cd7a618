//! Meter rows from a CSV export of the water-monthly table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{KpiError, Result};
use crate::meter::{MeterRecord, MonthSchema};

use super::cells::parse_reading;
use super::{
    ACCOUNT_COLUMN, LABEL_COLUMN, LEVEL_TAG_COLUMN, PARENT_COLUMN, RecordSource, TYPE_COLUMN,
    ZONE_COLUMN,
};

/// Reads meter records from a CSV file on every fetch.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvSource {
    fn fetch(&self, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
        let file = File::open(&self.path)?;
        let records = read_csv_records(BufReader::new(file), months)?;
        debug!(path = %self.path.display(), records = records.len(), "loaded CSV meter rows");
        Ok(records)
    }
}

/// Parses CSV meter rows from any reader.
///
/// The header must contain every month key in `months`. Text columns that
/// are absent read as empty strings; short rows read their missing cells as
/// blank.
///
/// # Errors
///
/// Returns [`KpiError::MissingColumn`] for an absent month column,
/// [`KpiError::InvalidReading`] for a non-numeric cell, or a CSV error.
pub fn read_csv_records<R: Read>(reader: R, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let month_columns = months
        .keys()
        .iter()
        .map(|key| {
            position(key)
                .map(|idx| (key.as_str(), idx))
                .ok_or_else(|| KpiError::MissingColumn(key.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let label = position(LABEL_COLUMN);
    let account = position(ACCOUNT_COLUMN);
    let level_tag = position(LEVEL_TAG_COLUMN);
    let zone = position(ZONE_COLUMN);
    let parent = position(PARENT_COLUMN);
    let meter_type = position(TYPE_COLUMN);

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let row_number = i + 1;

        let mut record = MeterRecord {
            label: text(&row, label),
            account: text(&row, account),
            level_tag: text(&row, level_tag),
            zone: text(&row, zone),
            parent_meter: text(&row, parent),
            meter_type: text(&row, meter_type),
            ..MeterRecord::default()
        };
        for (key, idx) in &month_columns {
            let raw = row.get(*idx).unwrap_or("");
            let value = parse_reading(row_number, key, raw)?;
            record.readings.insert((*key).to_string(), value);
        }
        records.push(record);
    }

    Ok(records)
}

fn text(row: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
