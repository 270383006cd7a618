//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use water_kpi::config::ExpectationsConfig;
use water_kpi::hierarchy::KpiSettings;
use water_kpi::meter::{DEFAULT_MONTH_KEYS, MeterRecord};

/// Builds a record whose readings fill the default months in order.
pub fn meter(label: &str, meter_type: &str, zone: &str, readings: &[Option<f64>]) -> MeterRecord {
    readings
        .iter()
        .zip(DEFAULT_MONTH_KEYS)
        .fold(
            MeterRecord::new(label, meter_type).with_zone(zone),
            |record, (value, month)| record.with_reading(month, *value),
        )
}

/// Builds a record with a single January reading equal to `total`.
pub fn meter_total(label: &str, meter_type: &str, total: f64) -> MeterRecord {
    meter(label, meter_type, "", &[Some(total)])
}

/// Reference network: one L1 of 1000, L2s of 400 and 500, L3s of 300, 250 and 200.
pub fn reference_network() -> Vec<MeterRecord> {
    vec![
        meter("Main Bulk (NAMA)", "Main BULK", "Main Bulk", &[Some(600.0), Some(400.0)]),
        meter("ZONE 3A (Bulk Zone 3A)", "Zone Bulk", "Zone_03_(A)", &[Some(200.0), Some(200.0)]),
        meter("ZONE 5 (Bulk Zone 5)", "Zone Bulk", "Zone_05", &[Some(500.0), None]),
        meter("Z3-42 (Villa)", "Residential (Villa)", "Zone_03_(A)", &[Some(150.0), Some(150.0)]),
        meter("D-44 Building Bulk Meter", "D_Building_Bulk", "Zone_03_(A)", &[Some(250.0)]),
        meter("Z5-17", "Residential (Villa)", "Zone_05", &[Some(120.0), Some(80.0)]),
    ]
}

/// Default settings with count expectations matching the reference network.
pub fn reference_settings() -> KpiSettings {
    KpiSettings::default().with_expectations(ExpectationsConfig {
        main_source_count: 1,
        villa_count: 2,
        building_bulk_count: 1,
    })
}

/// Path to a file under `tests/fixtures/`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Asserts two floats agree to within 1e-9.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
