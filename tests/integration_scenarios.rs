//! Integration tests for hierarchy KPI computation.

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use water_kpi::KpiError;
use water_kpi::hierarchy::{DataQualityWarning, LossStage, compute_metrics};
use water_kpi::meter::{HierarchyLevel, MeterClassifier, MeterRecord, total_consumption};

use common::{assert_close, meter, meter_total, reference_network, reference_settings};

#[test]
fn reference_network_losses_and_efficiency() {
    let report = compute_metrics(&reference_network(), &reference_settings()).expect("metrics");
    let m = &report.metrics;

    assert_close(m.a1_main_source, 1000.0);
    assert_close(m.a2_zone_distribution, 900.0);
    assert_close(m.a3_individual, 750.0);
    assert_close(m.stage1_loss, 100.0);
    assert_close(m.stage1_loss_percentage, 10.0);
    assert_close(m.stage2_loss, 150.0);
    assert!((m.stage2_loss_percentage - 16.67).abs() < 0.01);
    assert_close(m.total_system_loss, 250.0);
    assert_close(m.total_system_loss_percentage, 25.0);
    assert_close(m.system_efficiency, 75.0);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn zone_types_classify_case_insensitively() {
    let classifier = MeterClassifier::default();
    let west = MeterRecord::new("ZONE West", "Zone_Bulk_West");
    let lower = MeterRecord::new("ZONE 8", "zone bulk");
    assert_eq!(classifier.classify(&west).level, HierarchyLevel::L2);
    assert_eq!(classifier.classify(&lower).level, HierarchyLevel::L2);
}

#[test]
fn unrecognized_type_is_excluded_and_counted_once() {
    let mut records = reference_network();
    records.push(meter_total("Irrigation Tank 04", "Irrigation Control", 5000.0));

    let baseline = compute_metrics(&reference_network(), &reference_settings()).expect("metrics");
    let report = compute_metrics(&records, &reference_settings()).expect("metrics");

    assert_eq!(report.metrics.meter_counts.unknown, 1);
    assert_eq!(report.metrics.level_totals, baseline.metrics.level_totals);
    assert_eq!(report.metrics.a1_main_source, baseline.metrics.a1_main_source);
    match report.warnings.as_slice() {
        [DataQualityWarning::UnclassifiedMeters { count: 1, meters }] => {
            assert_eq!(meters[0].meter_type, "Irrigation Control");
        }
        other => panic!("expected a single unclassified warning, got {other:?}"),
    }
}

#[test]
fn blank_and_missing_months_sum_to_present_values() {
    let record = MeterRecord::new("Z3-42 (Villa)", "Residential (Villa)")
        .with_reading("Jan-25", Some(50.0))
        .with_reading("Feb-25", None);
    assert_eq!(total_consumption(&record, &["Jan-25", "Feb-25", "Mar-25"]), 50.0);
}

#[test]
fn negative_correction_flows_into_l3_total() {
    let mut records = reference_network();
    records.push(meter(
        "Z3-49 (Villa)",
        "Residential (Villa)",
        "Zone_03_(A)",
        &[Some(10.0), Some(-30.0)],
    ));
    let report = compute_metrics(&records, &reference_settings()).expect("metrics");
    assert_close(report.metrics.level_totals.l3, 730.0);
    assert_close(report.metrics.a3_individual, 730.0);
}

#[test]
fn empty_input_is_no_data_not_zeroes() {
    let result = compute_metrics(&[], &reference_settings());
    assert!(matches!(result, Err(KpiError::NoData)));
}

#[test]
fn zero_main_source_never_divides() {
    let records = vec![
        meter_total("ZONE 5 (Bulk Zone 5)", "Zone Bulk", 500.0),
        meter_total("Z5-17", "Residential (Villa)", 200.0),
    ];
    let report = compute_metrics(&records, &reference_settings()).expect("metrics");
    let m = &report.metrics;
    assert_eq!(m.system_efficiency, 0.0);
    assert_eq!(m.stage1_loss_percentage, 0.0);
    assert_eq!(m.total_system_loss_percentage, 0.0);
    assert_close(m.stage1_loss, -500.0);
    assert!(report.warnings.contains(&DataQualityWarning::NegativeStageLoss {
        stage: LossStage::Stage1,
        loss: -500.0,
    }));
}

const TYPES: [&str; 10] = [
    "Main BULK",
    "Zone Bulk",
    "Direct Connection",
    "Residential (Villa)",
    "D_Building_Bulk",
    "Residential (Apart)",
    "Retail",
    "IRR_Servies",
    "",
    "  ",
];

fn random_records(rng: &mut StdRng) -> Vec<MeterRecord> {
    let count = rng.random_range(1..60);
    (0..count)
        .map(|i| {
            let meter_type = TYPES[rng.random_range(0..TYPES.len())];
            let readings: Vec<Option<f64>> = (0..9)
                .map(|_| {
                    if rng.random_bool(0.2) {
                        None
                    } else {
                        Some(f64::from(rng.random_range(-50_i32..5000)) / 4.0)
                    }
                })
                .collect();
            meter(&format!("M-{i}"), meter_type, "Zone_01", &readings)
        })
        .collect()
}

#[test]
fn random_record_sets_satisfy_invariants() {
    let settings = reference_settings();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let records = random_records(&mut rng);
        let first = compute_metrics(&records, &settings).expect("metrics");
        let second = compute_metrics(&records, &settings).expect("metrics");

        // idempotent, bit for bit
        assert_eq!(first, second);

        let m = &first.metrics;
        assert_eq!(m.a1_main_source - m.a2_zone_distribution, m.stage1_loss);
        assert_eq!(m.a2_zone_distribution - m.a3_individual, m.stage2_loss);
        assert_eq!(m.stage1_loss + m.stage2_loss, m.total_system_loss);
        assert_eq!(m.meter_counts.total, records.len());

        for value in [
            m.system_efficiency,
            m.stage1_loss_percentage,
            m.stage2_loss_percentage,
            m.total_system_loss_percentage,
        ] {
            assert!(value.is_finite());
        }
        if m.a1_main_source == 0.0 {
            assert_eq!(m.system_efficiency, 0.0);
            assert_eq!(m.stage1_loss_percentage, 0.0);
        }
    }
}
