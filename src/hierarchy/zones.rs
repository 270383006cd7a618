//! Zone-level balance: zone bulk meter against the meters behind it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::meter::{MeterRecord, MeterSubtype, total_consumption};

use super::kpi::KpiSettings;
use super::model::{HierarchyModel, percentage};

/// Balance of one zone over the configured months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBalance {
    pub zone: String,
    /// Sum of the zone's L2 bulk meters (m³).
    pub zone_bulk: f64,
    /// Sum of the zone's individual meters (m³).
    pub individual_total: f64,
    /// `zone_bulk - individual_total`.
    pub difference: f64,
    /// Difference as a share of the zone bulk, zero when the bulk is not positive.
    pub loss_percentage: f64,
    pub zone_bulk_meters: usize,
    pub individual_meters: usize,
}

/// Balance of one zone for a single month key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneMonthlyBalance {
    pub zone: String,
    pub month: String,
    pub zone_bulk: f64,
    pub individual_total: f64,
    pub difference: f64,
    pub loss_percentage: f64,
}

#[derive(Default)]
struct ZoneAccumulator {
    zone_bulk: f64,
    individual: f64,
    zone_bulk_meters: usize,
    individual_meters: usize,
}

impl ZoneAccumulator {
    fn difference(&self) -> f64 {
        self.zone_bulk - self.individual
    }
}

fn counts_as_individual(subtype: MeterSubtype, model: HierarchyModel) -> bool {
    match subtype {
        MeterSubtype::Villa | MeterSubtype::BuildingBulk => true,
        MeterSubtype::Apartment => model.recognises_apartments(),
        _ => false,
    }
}

/// Which side of a zone balance a record counts toward.
#[derive(Clone, Copy)]
enum Side {
    Bulk,
    Individual,
}

fn zoned_records<'a>(
    records: &'a [MeterRecord],
    settings: &KpiSettings,
) -> Vec<(&'a str, Side, &'a MeterRecord)> {
    records
        .iter()
        .filter_map(|record| {
            let zone = record.zone.trim();
            if zone.is_empty() {
                return None;
            }
            let subtype = settings.classifier().classify(record).subtype;
            if subtype == MeterSubtype::ZoneBulk {
                Some((zone, Side::Bulk, record))
            } else if counts_as_individual(subtype, settings.model()) {
                Some((zone, Side::Individual, record))
            } else {
                None
            }
        })
        .collect()
}

fn accumulate<'a>(
    zoned: &[(&'a str, Side, &MeterRecord)],
    value: impl Fn(&MeterRecord) -> f64,
) -> BTreeMap<&'a str, ZoneAccumulator> {
    let mut zones: BTreeMap<&str, ZoneAccumulator> = BTreeMap::new();
    for (zone, side, record) in zoned {
        let acc = zones.entry(*zone).or_default();
        match side {
            Side::Bulk => {
                acc.zone_bulk += value(*record);
                acc.zone_bulk_meters += 1;
            }
            Side::Individual => {
                acc.individual += value(*record);
                acc.individual_meters += 1;
            }
        }
    }
    zones
}

/// Balances for every zone holding a zone bulk or individual meter,
/// sorted by zone name. Records with a blank zone are skipped.
pub fn zone_balances(records: &[MeterRecord], settings: &KpiSettings) -> Vec<ZoneBalance> {
    let months = settings.months().keys();
    let zoned = zoned_records(records, settings);

    accumulate(&zoned, |record| total_consumption(record, months))
        .into_iter()
        .map(|(zone, acc)| ZoneBalance {
            zone: zone.to_string(),
            zone_bulk: acc.zone_bulk,
            individual_total: acc.individual,
            difference: acc.difference(),
            loss_percentage: percentage(acc.difference(), acc.zone_bulk),
            zone_bulk_meters: acc.zone_bulk_meters,
            individual_meters: acc.individual_meters,
        })
        .collect()
}

/// Per-month balances, grouped by zone name and then in month-key order.
///
/// Uses the same zones and meters as [`zone_balances`]; each month sums only
/// that month's reading, blanks as zero.
pub fn zone_monthly_balances(
    records: &[MeterRecord],
    settings: &KpiSettings,
) -> Vec<ZoneMonthlyBalance> {
    let zoned = zoned_records(records, settings);
    let per_month: Vec<(&String, BTreeMap<&str, ZoneAccumulator>)> = settings
        .months()
        .keys()
        .iter()
        .map(|month| {
            let zones = accumulate(&zoned, |record| record.reading(month).unwrap_or(0.0));
            (month, zones)
        })
        .collect();

    let mut names: Vec<&str> = zoned.iter().map(|(zone, _, _)| *zone).collect();
    names.sort_unstable();
    names.dedup();

    let mut out = Vec::with_capacity(names.len() * per_month.len());
    for zone in names {
        for (month, zones) in &per_month {
            let Some(acc) = zones.get(zone) else {
                continue;
            };
            out.push(ZoneMonthlyBalance {
                zone: zone.to_string(),
                month: (*month).clone(),
                zone_bulk: acc.zone_bulk,
                individual_total: acc.individual,
                difference: acc.difference(),
                loss_percentage: percentage(acc.difference(), acc.zone_bulk),
            });
        }
    }
    out
}
