//! Hierarchy KPI computation from meter records.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CalculatorConfig, ClassifierConfig, ExpectationsConfig};
use crate::error::{KpiError, Result};
use crate::meter::{MeterClassifier, MeterRecord, MeterSubtype, MonthSchema, total_consumption};

use super::model::{HierarchyModel, LevelTotals, percentage};
use super::quality::{self, DataQualityWarning, UnclassifiedMeter};

/// Everything a computation needs besides the records themselves.
///
/// The classifier is always built for the active hierarchy model; changing
/// the model through [`KpiSettings::with_model`] rebuilds it.
#[derive(Debug, Clone)]
pub struct KpiSettings {
    keywords: ClassifierConfig,
    classifier: MeterClassifier,
    months: MonthSchema,
    model: HierarchyModel,
    expectations: ExpectationsConfig,
}

impl KpiSettings {
    pub fn from_config(config: &CalculatorConfig) -> Self {
        let model = config.hierarchy.model;
        Self {
            keywords: config.classifier.clone(),
            classifier: MeterClassifier::new(&config.classifier, model),
            months: config.months.clone(),
            model,
            expectations: config.expectations.clone(),
        }
    }

    /// Switches the hierarchy model and rebuilds the classifier to match.
    pub fn with_model(mut self, model: HierarchyModel) -> Self {
        self.classifier = MeterClassifier::new(&self.keywords, model);
        self.model = model;
        self
    }

    pub fn with_months(mut self, months: MonthSchema) -> Self {
        self.months = months;
        self
    }

    pub fn with_expectations(mut self, expectations: ExpectationsConfig) -> Self {
        self.expectations = expectations;
        self
    }

    pub fn classifier(&self) -> &MeterClassifier {
        &self.classifier
    }

    pub fn months(&self) -> &MonthSchema {
        &self.months
    }

    pub fn model(&self) -> HierarchyModel {
        self.model
    }

    pub fn expectations(&self) -> &ExpectationsConfig {
        &self.expectations
    }
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self::from_config(&CalculatorConfig::default())
    }
}

/// Meter instance counts per level and subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeterCounts {
    pub l1: usize,
    pub l2: usize,
    pub l3_villas: usize,
    pub l3_building_bulks: usize,
    pub l4_apartments: usize,
    pub direct_connections: usize,
    pub unknown: usize,
    /// Every record seen, unknown included.
    pub total: usize,
}

impl MeterCounts {
    fn record(&mut self, subtype: MeterSubtype) {
        match subtype {
            MeterSubtype::MainBulk => self.l1 += 1,
            MeterSubtype::ZoneBulk => self.l2 += 1,
            MeterSubtype::DirectConnection => self.direct_connections += 1,
            MeterSubtype::Villa => self.l3_villas += 1,
            MeterSubtype::BuildingBulk => self.l3_building_bulks += 1,
            MeterSubtype::Apartment => self.l4_apartments += 1,
            MeterSubtype::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    pub fn l3(&self) -> usize {
        self.l3_villas + self.l3_building_bulks
    }
}

/// Efficiency and loss indicators for one computation run.
///
/// Stage losses are not clamped: a negative value means downstream meters
/// read more than upstream ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterKpiMetrics {
    /// A1: total of all L1 meters (m³).
    pub a1_main_source: f64,
    /// A2: L2 zone bulks plus direct connections (m³).
    pub a2_zone_distribution: f64,
    /// A3: individual consumption under the active model (m³).
    pub a3_individual: f64,
    /// A3 measured at the bulk level (m³). Equal to A3 under the canonical model.
    pub a3_bulk_level: f64,
    /// A3 / A1 in percent.
    pub system_efficiency: f64,
    pub stage1_loss: f64,
    pub stage1_loss_percentage: f64,
    pub stage2_loss: f64,
    pub stage2_loss_percentage: f64,
    pub total_system_loss: f64,
    pub total_system_loss_percentage: f64,
    pub level_totals: LevelTotals,
    pub meter_counts: MeterCounts,
    pub model: HierarchyModel,
}

impl WaterKpiMetrics {
    /// Derives every indicator from accumulated level totals.
    ///
    /// # Arguments
    ///
    /// * `totals` - Per-level consumption sums
    /// * `counts` - Per-level meter counts
    /// * `model` - Formula set used for A3
    pub fn derive(totals: LevelTotals, counts: MeterCounts, model: HierarchyModel) -> Self {
        let a1 = totals.a1();
        let a2 = totals.a2();
        let a3 = totals.a3_individual(model);

        let stage1_loss = a1 - a2;
        let stage2_loss = a2 - a3;
        let total_system_loss = stage1_loss + stage2_loss;

        Self {
            a1_main_source: a1,
            a2_zone_distribution: a2,
            a3_individual: a3,
            a3_bulk_level: totals.a3_bulk_level(model),
            system_efficiency: percentage(a3, a1),
            stage1_loss,
            stage1_loss_percentage: percentage(stage1_loss, a1),
            stage2_loss,
            stage2_loss_percentage: percentage(stage2_loss, a2),
            total_system_loss,
            total_system_loss_percentage: percentage(total_system_loss, a1),
            level_totals: totals,
            meter_counts: counts,
            model,
        }
    }
}

impl fmt::Display for WaterKpiMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Water KPI Report ---")?;
        writeln!(f, "Hierarchy model:     {}", self.model)?;
        writeln!(f, "A1 main source:      {:.2} m³", self.a1_main_source)?;
        writeln!(f, "A2 zone distrib.:    {:.2} m³", self.a2_zone_distribution)?;
        writeln!(f, "A3 individual:       {:.2} m³", self.a3_individual)?;
        if self.model == HierarchyModel::ExtendedL4 {
            writeln!(f, "A3 bulk level:       {:.2} m³", self.a3_bulk_level)?;
        }
        writeln!(f, "System efficiency:   {:.2}%", self.system_efficiency)?;
        writeln!(
            f,
            "Stage 1 loss:        {:.2} m³ ({:.2}%)",
            self.stage1_loss, self.stage1_loss_percentage
        )?;
        writeln!(
            f,
            "Stage 2 loss:        {:.2} m³ ({:.2}%)",
            self.stage2_loss, self.stage2_loss_percentage
        )?;
        writeln!(
            f,
            "Total system loss:   {:.2} m³ ({:.2}%)",
            self.total_system_loss, self.total_system_loss_percentage
        )?;
        let c = &self.meter_counts;
        write!(
            f,
            "Meters:              {} (L1 {}, L2 {}, DC {}, ",
            c.total, c.l1, c.l2, c.direct_connections
        )?;
        write!(
            f,
            "L3 villas {}, L3 buildings {}, L4 {}, unknown {})",
            c.l3_villas, c.l3_building_bulks, c.l4_apartments, c.unknown
        )
    }
}

/// Metrics plus the advisory warnings raised while computing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub metrics: WaterKpiMetrics,
    pub warnings: Vec<DataQualityWarning>,
}

/// Classifies, sums and derives KPIs over `records` in input order.
///
/// Unknown meters are excluded from every level total and reported in a
/// warning. The result is a pure function of `records` and `settings`.
///
/// # Errors
///
/// Returns [`KpiError::NoData`] if `records` is empty.
pub fn compute_metrics(records: &[MeterRecord], settings: &KpiSettings) -> Result<KpiReport> {
    if records.is_empty() {
        return Err(KpiError::NoData);
    }

    let months = settings.months.keys();
    let mut totals = LevelTotals::default();
    let mut counts = MeterCounts::default();
    let mut unclassified = Vec::new();

    for record in records {
        let classification = settings.classifier.classify(record);
        counts.record(classification.subtype);

        if classification.is_unknown() {
            debug!(
                label = %record.label,
                meter_type = %record.meter_type,
                "meter type not recognised"
            );
            unclassified.push(UnclassifiedMeter {
                label: record.label.clone(),
                meter_type: record.meter_type.clone(),
            });
            continue;
        }

        totals.add(classification.subtype, total_consumption(record, months));
    }

    let metrics = WaterKpiMetrics::derive(totals, counts, settings.model);
    let warnings = quality::assess(&metrics, unclassified, &settings.expectations);
    for warning in &warnings {
        warn!("{warning}");
    }

    info!(
        records = records.len(),
        model = %settings.model,
        a1 = metrics.a1_main_source,
        a2 = metrics.a2_zone_distribution,
        a3 = metrics.a3_individual,
        efficiency = metrics.system_efficiency,
        "computed water KPIs"
    );

    Ok(KpiReport { metrics, warnings })
}
