//! Hierarchy model strategy and per-level running totals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::meter::MeterSubtype;

/// Which level structure the A1/A2/A3 formulas assume.
///
/// - `Canonical`: L1 → L2 + DC → L3. A3 is every L3 meter.
/// - `ExtendedL4`: apartments behind building bulk meters are a fourth
///   level. A3 is villas + apartments + direct connections, and the bulk
///   view of A3 is all L3 meters + direct connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyModel {
    #[default]
    Canonical,
    ExtendedL4,
}

impl HierarchyModel {
    pub fn recognises_apartments(self) -> bool {
        matches!(self, Self::ExtendedL4)
    }
}

impl fmt::Display for HierarchyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canonical => f.write_str("canonical"),
            Self::ExtendedL4 => f.write_str("extended_l4"),
        }
    }
}

/// Consumption summed per level, accumulated in input order.
///
/// `l3` is its own running sum rather than `l3_villa + l3_building_bulk`,
/// so its value does not depend on how the subtypes interleave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelTotals {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub l3_villa: f64,
    pub l3_building_bulk: f64,
    pub l4: f64,
    pub dc: f64,
}

impl LevelTotals {
    /// Adds `value` to the sums for `subtype`. Unknown meters are dropped.
    pub fn add(&mut self, subtype: MeterSubtype, value: f64) {
        match subtype {
            MeterSubtype::MainBulk => self.l1 += value,
            MeterSubtype::ZoneBulk => self.l2 += value,
            MeterSubtype::DirectConnection => self.dc += value,
            MeterSubtype::Villa => {
                self.l3 += value;
                self.l3_villa += value;
            }
            MeterSubtype::BuildingBulk => {
                self.l3 += value;
                self.l3_building_bulk += value;
            }
            MeterSubtype::Apartment => self.l4 += value,
            MeterSubtype::Unknown => {}
        }
    }

    /// A1: main source input.
    pub fn a1(&self) -> f64 {
        self.l1
    }

    /// A2: zone distribution, zone bulks plus direct connections.
    pub fn a2(&self) -> f64 {
        self.l2 + self.dc
    }

    /// A3: individual consumption under `model`.
    pub fn a3_individual(&self, model: HierarchyModel) -> f64 {
        match model {
            HierarchyModel::Canonical => self.l3,
            HierarchyModel::ExtendedL4 => self.l3_villa + self.l4 + self.dc,
        }
    }

    /// A3 measured at the bulk level under `model`.
    pub fn a3_bulk_level(&self, model: HierarchyModel) -> f64 {
        match model {
            HierarchyModel::Canonical => self.l3,
            HierarchyModel::ExtendedL4 => self.l3 + self.dc,
        }
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}
