//! Record selection by zone, type and label, plus distinct-value helpers.

use std::collections::BTreeSet;

use crate::meter::MeterRecord;

/// Narrows a record set before computation.
///
/// Zone and type match exactly after trimming. The label search is a
/// case-insensitive substring match. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub zone: Option<String>,
    pub meter_type: Option<String>,
    pub label_contains: Option<String>,
}

impl RecordFilter {
    pub fn by_zone(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            ..Self::default()
        }
    }

    pub fn by_type(meter_type: impl Into<String>) -> Self {
        Self {
            meter_type: Some(meter_type.into()),
            ..Self::default()
        }
    }

    pub fn search(label: impl Into<String>) -> Self {
        Self {
            label_contains: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zone.is_none() && self.meter_type.is_none() && self.label_contains.is_none()
    }

    pub fn matches(&self, record: &MeterRecord) -> bool {
        let zone_ok = self
            .zone
            .as_ref()
            .is_none_or(|zone| record.zone.trim() == zone.trim());
        let type_ok = self
            .meter_type
            .as_ref()
            .is_none_or(|meter_type| record.meter_type.trim() == meter_type.trim());
        let label_ok = self
            .label_contains
            .as_ref()
            .is_none_or(|needle| record.label.to_lowercase().contains(&needle.to_lowercase()));
        zone_ok && type_ok && label_ok
    }

    /// Keeps matching records, preserving input order.
    pub fn apply(&self, mut records: Vec<MeterRecord>) -> Vec<MeterRecord> {
        if !self.is_empty() {
            records.retain(|record| self.matches(record));
        }
        records
    }
}

/// Sorted distinct non-blank zones.
pub fn distinct_zones(records: &[MeterRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.zone.as_str()))
}

/// Sorted distinct non-blank meter types.
pub fn distinct_meter_types(records: &[MeterRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.meter_type.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
