//! Per-month KPI series using the same classification as the totals.

use serde::Serialize;

use crate::meter::{MeterRecord, MeterSubtype};

use super::kpi::KpiSettings;
use super::model::{LevelTotals, percentage};

/// A1/A2/A3 and stage losses for a single month key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKpiPoint {
    pub month: String,
    pub a1_main_source: f64,
    pub a2_zone_distribution: f64,
    pub a3_individual: f64,
    pub stage1_loss: f64,
    pub stage2_loss: f64,
    pub system_efficiency: f64,
}

/// One point per month key, in schema order.
///
/// Records are classified once; each month then sums the single reading per
/// record in input order. Blank readings count as zero.
pub fn monthly_series(records: &[MeterRecord], settings: &KpiSettings) -> Vec<MonthlyKpiPoint> {
    let subtypes: Vec<MeterSubtype> = records
        .iter()
        .map(|record| settings.classifier().classify(record).subtype)
        .collect();

    settings
        .months()
        .keys()
        .iter()
        .map(|month| {
            let mut totals = LevelTotals::default();
            for (record, subtype) in records.iter().zip(&subtypes) {
                totals.add(*subtype, record.reading(month).unwrap_or(0.0));
            }

            let a1 = totals.a1();
            let a2 = totals.a2();
            let a3 = totals.a3_individual(settings.model());
            MonthlyKpiPoint {
                month: month.clone(),
                a1_main_source: a1,
                a2_zone_distribution: a2,
                a3_individual: a3,
                stage1_loss: a1 - a2,
                stage2_loss: a2 - a3,
                system_efficiency: percentage(a3, a1),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::MonthSchema;

    fn settings() -> KpiSettings {
        KpiSettings::default().with_months(MonthSchema::new(1, ["Jan-25", "Feb-25"]))
    }

    #[test]
    fn one_point_per_month_in_schema_order() {
        let records = vec![
            MeterRecord::new("Main Bulk (NAMA)", "Main BULK")
                .with_reading("Jan-25", Some(100.0))
                .with_reading("Feb-25", Some(200.0)),
            MeterRecord::new("ZONE 3", "Zone Bulk")
                .with_reading("Jan-25", Some(90.0))
                .with_reading("Feb-25", None),
            MeterRecord::new("Z3-42", "Residential (Villa)").with_reading("Feb-25", Some(50.0)),
        ];
        let series = monthly_series(&records, &settings());
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].month, "Jan-25");
        assert_eq!(series[0].stage1_loss, 10.0);
        assert_eq!(series[0].stage2_loss, 90.0);

        assert_eq!(series[1].month, "Feb-25");
        assert_eq!(series[1].a2_zone_distribution, 0.0);
        assert_eq!(series[1].stage2_loss, -50.0);
        assert_eq!(series[1].system_efficiency, 25.0);
    }

    #[test]
    fn monthly_points_sum_to_run_totals() {
        let records = vec![
            MeterRecord::new("Main Bulk (NAMA)", "Main BULK")
                .with_reading("Jan-25", Some(100.0))
                .with_reading("Feb-25", Some(200.0)),
            MeterRecord::new("Hotel Main", "Direct Connection")
                .with_reading("Jan-25", Some(30.0))
                .with_reading("Feb-25", Some(40.0)),
        ];
        let series = monthly_series(&records, &settings());
        let a1: f64 = series.iter().map(|p| p.a1_main_source).sum();
        let a2: f64 = series.iter().map(|p| p.a2_zone_distribution).sum();
        assert_eq!(a1, 300.0);
        assert_eq!(a2, 70.0);
    }

    #[test]
    fn no_records_yield_zero_points() {
        let series = monthly_series(&[], &settings());
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|p| p.a1_main_source == 0.0 && p.system_efficiency == 0.0));
    }
}
