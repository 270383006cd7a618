//! Non-fatal data-quality checks on a computed KPI set.

use std::fmt;

use serde::Serialize;

use crate::config::ExpectationsConfig;

use super::kpi::WaterKpiMetrics;

/// A meter the classifier could not place, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedMeter {
    pub label: String,
    pub meter_type: String,
}

/// Meter category with a configured expected count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountCategory {
    MainSource,
    Villa,
    BuildingBulk,
}

impl fmt::Display for CountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainSource => f.write_str("Main Source"),
            Self::Villa => f.write_str("Villa"),
            Self::BuildingBulk => f.write_str("Building Bulk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LossStage {
    /// Main source to zone distribution.
    Stage1,
    /// Zone distribution to individual consumption.
    Stage2,
}

impl fmt::Display for LossStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage1 => f.write_str("Stage 1"),
            Self::Stage2 => f.write_str("Stage 2"),
        }
    }
}

/// Advisory signal returned next to valid metrics. Never blocks a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Records that matched no category. Their consumption is excluded from
    /// every level total.
    UnclassifiedMeters {
        count: usize,
        meters: Vec<UnclassifiedMeter>,
    },
    /// Observed meter count differs from the configured expectation.
    CountMismatch {
        category: CountCategory,
        expected: usize,
        found: usize,
    },
    /// A stage loss came out negative: downstream meters read more than
    /// upstream. Usually calibration or reading-date skew.
    NegativeStageLoss { stage: LossStage, loss: f64 },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclassifiedMeters { count, .. } => {
                write!(f, "{count} meters with unknown type")
            }
            Self::CountMismatch {
                category,
                expected,
                found,
            } => write!(f, "expected {expected} {category} meters, found {found}"),
            Self::NegativeStageLoss { stage, loss } => write!(
                f,
                "{stage} loss is negative ({loss:.2} m³); check meter calibration or reading dates"
            ),
        }
    }
}

/// Runs every check and returns the warnings in a fixed order:
/// unclassified meters, count mismatches, negative losses.
pub fn assess(
    metrics: &WaterKpiMetrics,
    unclassified: Vec<UnclassifiedMeter>,
    expectations: &ExpectationsConfig,
) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();

    if !unclassified.is_empty() {
        warnings.push(DataQualityWarning::UnclassifiedMeters {
            count: unclassified.len(),
            meters: unclassified,
        });
    }

    let counts = &metrics.meter_counts;
    let checks = [
        (
            CountCategory::MainSource,
            expectations.main_source_count,
            counts.l1,
        ),
        (CountCategory::Villa, expectations.villa_count, counts.l3_villas),
        (
            CountCategory::BuildingBulk,
            expectations.building_bulk_count,
            counts.l3_building_bulks,
        ),
    ];
    for (category, expected, found) in checks {
        if expected != found {
            warnings.push(DataQualityWarning::CountMismatch {
                category,
                expected,
                found,
            });
        }
    }

    for (stage, loss) in [
        (LossStage::Stage1, metrics.stage1_loss),
        (LossStage::Stage2, metrics.stage2_loss),
    ] {
        if loss < 0.0 {
            warnings.push(DataQualityWarning::NegativeStageLoss { stage, loss });
        }
    }

    warnings
}
