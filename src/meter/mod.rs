//! Meter records, month schema, consumption sums, and classification.

mod classifier;
mod consumption;
mod types;

pub use classifier::MeterClassifier;
pub use consumption::{monthly_values, total_consumption};
pub use types::{
    Classification, DEFAULT_MONTH_KEYS, HierarchyLevel, MeterRecord, MeterSubtype, MonthSchema,
};
