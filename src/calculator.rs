//! Fetch, filter and compute: one KPI run over an injected record source.

use serde::Serialize;
use tracing::info;

use crate::config::CalculatorConfig;
use crate::error::Result;
use crate::hierarchy::{
    KpiRatings, KpiReport, KpiSettings, LevelBreakdown, MonthlyKpiPoint, ZoneBalance,
    ZoneMonthlyBalance, compute_metrics, level_breakdown, monthly_series, zone_balances,
    zone_monthly_balances,
};
use crate::source::{RecordFilter, RecordSource, distinct_meter_types, distinct_zones};

/// Everything computed from one fetch of the record source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRun {
    pub report: KpiReport,
    pub ratings: KpiRatings,
    pub breakdown: Vec<LevelBreakdown>,
    pub monthly: Vec<MonthlyKpiPoint>,
    pub zones: Vec<ZoneBalance>,
    pub zone_monthly: Vec<ZoneMonthlyBalance>,
    /// Distinct zones across the fetched records, before filtering.
    pub available_zones: Vec<String>,
    /// Distinct meter types across the fetched records, before filtering.
    pub available_types: Vec<String>,
    /// Records left after filtering.
    pub record_count: usize,
}

/// Water KPI calculator over a record source.
///
/// Records are fetched fresh on every call; nothing is cached between runs.
pub struct KpiCalculator<S> {
    source: S,
    settings: KpiSettings,
}

impl<S: RecordSource> KpiCalculator<S> {
    pub fn new(source: S, settings: KpiSettings) -> Self {
        Self { source, settings }
    }

    pub fn from_config(source: S, config: &CalculatorConfig) -> Self {
        Self::new(source, KpiSettings::from_config(config))
    }

    pub fn settings(&self) -> &KpiSettings {
        &self.settings
    }

    /// Fetches all records and computes the headline metrics.
    ///
    /// # Errors
    ///
    /// Propagates source failures; returns `NoData` when nothing is fetched.
    pub fn compute(&self) -> Result<KpiReport> {
        let records = self.source.fetch(self.settings.months())?;
        compute_metrics(&records, &self.settings)
    }

    /// Fetches, applies `filter`, and computes metrics plus every derived view.
    ///
    /// # Errors
    ///
    /// Propagates source failures; returns `NoData` when no record survives
    /// the filter.
    pub fn run(&self, filter: &RecordFilter) -> Result<KpiRun> {
        let fetched = self.source.fetch(self.settings.months())?;
        let available_zones = distinct_zones(&fetched);
        let available_types = distinct_meter_types(&fetched);
        let fetched_count = fetched.len();

        let records = filter.apply(fetched);
        info!(
            fetched = fetched_count,
            kept = records.len(),
            months = self.settings.months().len(),
            "running KPI computation"
        );

        let report = compute_metrics(&records, &self.settings)?;
        let ratings = KpiRatings::from_metrics(&report.metrics);
        let breakdown = level_breakdown(&report.metrics);
        let monthly = monthly_series(&records, &self.settings);
        let zones = zone_balances(&records, &self.settings);
        let zone_monthly = zone_monthly_balances(&records, &self.settings);

        Ok(KpiRun {
            report,
            ratings,
            breakdown,
            monthly,
            zones,
            zone_monthly,
            available_zones,
            available_types,
            record_count: records.len(),
        })
    }
}
