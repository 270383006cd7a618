//! Consumption by level and dashboard performance ratings.

use std::fmt;

use serde::Serialize;

use super::kpi::WaterKpiMetrics;
use super::model::{HierarchyModel, percentage};

/// One row of the consumption-by-level view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelBreakdown {
    pub level: String,
    pub consumption: f64,
    pub meter_count: usize,
    /// Share of A1 in percent.
    pub percentage: f64,
}

/// Rows for A1, A2 and A3, each as a share of the main source.
pub fn level_breakdown(metrics: &WaterKpiMetrics) -> Vec<LevelBreakdown> {
    let counts = &metrics.meter_counts;
    let a1 = metrics.a1_main_source;

    let (individual_label, individual_meters) = match metrics.model {
        HierarchyModel::Canonical => ("L3 - Individual Properties", counts.l3()),
        HierarchyModel::ExtendedL4 => (
            "L3 Villas + L4 + DC - Individual",
            counts.l3_villas + counts.l4_apartments + counts.direct_connections,
        ),
    };

    vec![
        LevelBreakdown {
            level: "L1 - Main Source".to_string(),
            consumption: a1,
            meter_count: counts.l1,
            percentage: 100.0,
        },
        LevelBreakdown {
            level: "L2 - Zone Distribution + DC".to_string(),
            consumption: metrics.a2_zone_distribution,
            meter_count: counts.l2 + counts.direct_connections,
            percentage: percentage(metrics.a2_zone_distribution, a1),
        },
        LevelBreakdown {
            level: individual_label.to_string(),
            consumption: metrics.a3_individual,
            meter_count: individual_meters,
            percentage: percentage(metrics.a3_individual, a1),
        },
    ]
}

/// Status band shown next to an efficiency or loss figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl PerformanceRating {
    /// Bands for system efficiency: 85, 75 and 65 percent lower bounds.
    pub fn from_efficiency(efficiency_pct: f64) -> Self {
        if efficiency_pct >= 85.0 {
            Self::Excellent
        } else if efficiency_pct >= 75.0 {
            Self::Good
        } else if efficiency_pct >= 65.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }

    /// Bands for a loss percentage: below 10, 20 and 30 percent.
    pub fn from_loss(loss_pct: f64) -> Self {
        if loss_pct < 10.0 {
            Self::Excellent
        } else if loss_pct < 20.0 {
            Self::Good
        } else if loss_pct < 30.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => f.write_str("excellent"),
            Self::Good => f.write_str("good"),
            Self::Average => f.write_str("average"),
            Self::Poor => f.write_str("poor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiRatings {
    pub efficiency: PerformanceRating,
    pub stage1_loss: PerformanceRating,
    pub stage2_loss: PerformanceRating,
    pub total_loss: PerformanceRating,
}

impl KpiRatings {
    pub fn from_metrics(metrics: &WaterKpiMetrics) -> Self {
        Self {
            efficiency: PerformanceRating::from_efficiency(metrics.system_efficiency),
            stage1_loss: PerformanceRating::from_loss(metrics.stage1_loss_percentage),
            stage2_loss: PerformanceRating::from_loss(metrics.stage2_loss_percentage),
            total_loss: PerformanceRating::from_loss(metrics.total_system_loss_percentage),
        }
    }
}
