//! Meter record model and hierarchy classification types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Month columns of the water-monthly table, schema version 1.
pub const DEFAULT_MONTH_KEYS: [&str; 9] = [
    "Jan-25", "Feb-25", "Mar-25", "Apr-25", "May-25", "Jun-25", "Jul-25", "Aug-25", "Sep-25",
];

/// Fixed, versioned, ordered list of month keys a computation sums over.
///
/// The order is the summation order, which keeps totals reproducible.
///
/// # Examples
///
/// ```
/// use water_kpi::meter::MonthSchema;
///
/// let months = MonthSchema::default();
/// assert_eq!(months.version, 1);
/// assert_eq!(months.len(), 9);
/// assert_eq!(months.index_of("Mar-25"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonthSchema {
    /// Schema version; bump whenever the key list changes.
    pub version: u32,
    /// Month keys in calendar order.
    pub keys: Vec<String>,
}

impl Default for MonthSchema {
    fn default() -> Self {
        Self::new(1, DEFAULT_MONTH_KEYS)
    }
}

impl MonthSchema {
    pub fn new<I, K>(version: u32, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            version,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of `key` in the schema, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}

/// One meter row as delivered by the data source. Read-only input.
///
/// `readings` maps a month key to its value; `None` marks a blank cell.
/// Keys absent from the map are missing readings. Both count as zero when
/// summed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeterRecord {
    /// Human-readable meter label, e.g. `"Z3-42 (Villa)"`.
    pub label: String,
    /// Billing account number.
    pub account: String,
    /// Level tag carried by the source row (`L1`..`L4`, `DC`). Informational.
    pub level_tag: String,
    /// Administrative zone identifier.
    pub zone: String,
    /// Upstream meter this one is billed against. Informational.
    pub parent_meter: String,
    /// Free-text category tag, e.g. `"Residential (Villa)"`.
    pub meter_type: String,
    pub readings: BTreeMap<String, Option<f64>>,
}

impl MeterRecord {
    pub fn new(label: impl Into<String>, meter_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            meter_type: meter_type.into(),
            ..Self::default()
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn with_parent(mut self, parent_meter: impl Into<String>) -> Self {
        self.parent_meter = parent_meter.into();
        self
    }

    pub fn with_level_tag(mut self, level_tag: impl Into<String>) -> Self {
        self.level_tag = level_tag.into();
        self
    }

    /// Sets the reading for `month`; `None` records a blank cell.
    pub fn with_reading(mut self, month: impl Into<String>, value: Option<f64>) -> Self {
        self.readings.insert(month.into(), value);
        self
    }

    /// Reading for `month`, or `None` when blank or missing.
    pub fn reading(&self, month: &str) -> Option<f64> {
        self.readings.get(month).copied().flatten()
    }
}

/// Position of a meter in the distribution network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HierarchyLevel {
    /// Main source bulk meter.
    L1,
    /// Zone bulk meter.
    L2,
    /// Individual property: villa or building bulk.
    L3,
    /// Apartment behind a building bulk meter. Only produced by the
    /// extended hierarchy model.
    L4,
    /// Direct connection, fed without a zone bulk meter.
    DC,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
            Self::L4 => "L4",
            Self::DC => "DC",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Finer category inside a [`HierarchyLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterSubtype {
    MainBulk,
    ZoneBulk,
    DirectConnection,
    Villa,
    BuildingBulk,
    Apartment,
    Unknown,
}

impl MeterSubtype {
    pub fn level(self) -> HierarchyLevel {
        match self {
            Self::MainBulk => HierarchyLevel::L1,
            Self::ZoneBulk => HierarchyLevel::L2,
            Self::DirectConnection => HierarchyLevel::DC,
            Self::Villa | Self::BuildingBulk => HierarchyLevel::L3,
            Self::Apartment => HierarchyLevel::L4,
            Self::Unknown => HierarchyLevel::Unknown,
        }
    }
}

impl fmt::Display for MeterSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MainBulk => "Main_Bulk",
            Self::ZoneBulk => "Zone_Bulk",
            Self::DirectConnection => "Direct_Connection",
            Self::Villa => "Villa",
            Self::BuildingBulk => "Building_Bulk",
            Self::Apartment => "Apartment",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Result of classifying one record: its level and subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub level: HierarchyLevel,
    pub subtype: MeterSubtype,
}

impl From<MeterSubtype> for Classification {
    fn from(subtype: MeterSubtype) -> Self {
        Self {
            level: subtype.level(),
            subtype,
        }
    }
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.level == HierarchyLevel::Unknown
    }
}
