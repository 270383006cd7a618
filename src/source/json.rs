//! Meter rows from a JSON array of row objects, as a query API returns them.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{KpiError, Result};
use crate::meter::{MeterRecord, MonthSchema};

use super::cells::parse_reading;
use super::{
    ACCOUNT_COLUMN, LABEL_COLUMN, LEVEL_TAG_COLUMN, PARENT_COLUMN, RecordSource, TYPE_COLUMN,
    ZONE_COLUMN,
};

type Row = Map<String, Value>;

/// Reads meter records from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonSource {
    fn fetch(&self, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
        let file = File::open(&self.path)?;
        let records = read_json_records(BufReader::new(file), months)?;
        debug!(path = %self.path.display(), records = records.len(), "loaded JSON meter rows");
        Ok(records)
    }
}

/// Parses a JSON array of row objects.
///
/// A month key absent from a row is a missing reading. Month values may be
/// numbers, null, or numeric strings.
///
/// # Errors
///
/// Returns [`KpiError::InvalidReading`] for a value that is not a reading,
/// or a JSON error when the document is not an array of objects.
pub fn read_json_records<R: Read>(reader: R, months: &MonthSchema) -> Result<Vec<MeterRecord>> {
    let rows: Vec<Row> = serde_json::from_reader(reader)?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| row_to_record(i + 1, row, months))
        .collect()
}

fn row_to_record(row_number: usize, row: &Row, months: &MonthSchema) -> Result<MeterRecord> {
    let mut record = MeterRecord {
        label: text(row, LABEL_COLUMN),
        account: text(row, ACCOUNT_COLUMN),
        level_tag: text(row, LEVEL_TAG_COLUMN),
        zone: text(row, ZONE_COLUMN),
        parent_meter: text(row, PARENT_COLUMN),
        meter_type: text(row, TYPE_COLUMN),
        ..MeterRecord::default()
    };

    for key in months.keys() {
        let value = match row.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Some(v),
                _ => return Err(invalid(row_number, key, n.to_string())),
            },
            Some(Value::String(s)) => parse_reading(row_number, key, s)?,
            Some(other) => return Err(invalid(row_number, key, other.to_string())),
        };
        record.readings.insert(key.clone(), value);
    }

    Ok(record)
}

fn text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn invalid(row: usize, column: &str, value: String) -> KpiError {
    KpiError::InvalidReading {
        row,
        column: column.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months() -> MonthSchema {
        MonthSchema::new(1, ["Jan-25", "Feb-25", "Mar-25"])
    }

    #[test]
    fn rows_map_to_records() {
        let data = r#"[
            {"Meter Label": "Z3-42 (Villa)", "Acct #": 4300002, "Zone": "Zone_03_(A)",
             "Type": "Residential (Villa)", "Jan-25": 50, "Feb-25": null, "Mar-25": "1,200"},
            {"Meter Label": "Main Bulk (NAMA)", "Type": "Main BULK", "Jan-25": 32580.5}
        ]"#;
        let records = read_json_records(data.as_bytes(), &months()).expect("parse");
        assert_eq!(records.len(), 2);

        let villa = &records[0];
        assert_eq!(villa.account, "4300002");
        assert_eq!(villa.zone, "Zone_03_(A)");
        assert_eq!(villa.reading("Jan-25"), Some(50.0));
        assert_eq!(villa.reading("Feb-25"), None);
        assert_eq!(villa.reading("Mar-25"), Some(1200.0));

        let main = &records[1];
        assert_eq!(main.reading("Jan-25"), Some(32580.5));
        assert_eq!(main.reading("Mar-25"), None);
        assert_eq!(main.parent_meter, "");
    }

    #[test]
    fn non_numeric_values_are_rejected_with_row() {
        let data = r#"[
            {"Meter Label": "Z5-17", "Type": "Residential (Villa)", "Jan-25": 1},
            {"Meter Label": "Z5-18", "Type": "Residential (Villa)", "Feb-25": true}
        ]"#;
        let err = read_json_records(data.as_bytes(), &months());
        assert!(matches!(
            err,
            Err(KpiError::InvalidReading { row: 2, ref column, .. }) if column == "Feb-25"
        ));
    }

    #[test]
    fn document_must_be_an_array_of_objects() {
        let err = read_json_records(r#"{"rows": []}"#.as_bytes(), &months());
        assert!(matches!(err, Err(KpiError::Json(_))));
    }

    #[test]
    fn empty_array_yields_no_records() {
        let records = read_json_records("[]".as_bytes(), &months()).expect("parse");
        assert!(records.is_empty());
    }
}
