//! Water-distribution hierarchy KPIs and the views derived from them.

pub mod breakdown;
pub mod kpi;
/// Hierarchy model strategy and per-level totals.
pub mod model;
pub mod monthly;
/// Data-quality warnings raised next to valid metrics.
pub mod quality;
pub mod zones;

pub use breakdown::{KpiRatings, LevelBreakdown, PerformanceRating, level_breakdown};
pub use kpi::{KpiReport, KpiSettings, MeterCounts, WaterKpiMetrics, compute_metrics};
pub use model::{HierarchyModel, LevelTotals};
pub use monthly::{MonthlyKpiPoint, monthly_series};
pub use quality::{CountCategory, DataQualityWarning, LossStage, UnclassifiedMeter};
pub use zones::{ZoneBalance, ZoneMonthlyBalance, zone_balances, zone_monthly_balances};
