//! Keyword-based classification of meters into hierarchy levels.

use crate::config::ClassifierConfig;
use crate::hierarchy::HierarchyModel;

use super::types::{Classification, MeterRecord, MeterSubtype};

/// Classifies meter records by label markers and type keywords.
///
/// Matching rules:
/// - a label containing any override marker (case-sensitive) is `L1`,
///   whatever its type tag says;
/// - otherwise the type is trimmed and lowercased, then tested against the
///   keyword categories in priority order: main source, zone bulk, direct
///   connection, apartment (extended model only), villa, building bulk;
/// - the first category with a keyword contained in the type wins;
/// - no match is `UNKNOWN`.
///
/// Classification is total and never fails.
#[derive(Debug, Clone)]
pub struct MeterClassifier {
    label_overrides: Vec<String>,
    categories: Vec<(MeterSubtype, Vec<String>)>,
}

impl Default for MeterClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default(), HierarchyModel::Canonical)
    }
}

impl MeterClassifier {
    /// Builds a classifier from keyword configuration for the given model.
    pub fn new(config: &ClassifierConfig, model: HierarchyModel) -> Self {
        let mut categories = vec![
            (MeterSubtype::MainBulk, normalize_keywords(&config.main_source)),
            (MeterSubtype::ZoneBulk, normalize_keywords(&config.zone_bulk)),
            (
                MeterSubtype::DirectConnection,
                normalize_keywords(&config.direct_connection),
            ),
        ];
        if model.recognises_apartments() {
            categories.push((MeterSubtype::Apartment, normalize_keywords(&config.apartment)));
        }
        categories.push((MeterSubtype::Villa, normalize_keywords(&config.villa)));
        categories.push((
            MeterSubtype::BuildingBulk,
            normalize_keywords(&config.building_bulk),
        ));

        let label_overrides = config
            .label_overrides
            .iter()
            .filter(|marker| !marker.trim().is_empty())
            .cloned()
            .collect();

        Self {
            label_overrides,
            categories,
        }
    }

    /// Classifies one record.
    pub fn classify(&self, record: &MeterRecord) -> Classification {
        if self
            .label_overrides
            .iter()
            .any(|marker| record.label.contains(marker.as_str()))
        {
            return MeterSubtype::MainBulk.into();
        }
        self.classify_type(&record.meter_type).into()
    }

    /// Subtype for a bare type tag, ignoring label overrides.
    pub fn classify_type(&self, meter_type: &str) -> MeterSubtype {
        let normalized = meter_type.trim().to_lowercase();
        if normalized.is_empty() {
            return MeterSubtype::Unknown;
        }
        self.categories
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k.as_str())))
            .map_or(MeterSubtype::Unknown, |(subtype, _)| *subtype)
    }

    /// Subtypes in the order they are tested.
    pub fn priority(&self) -> impl Iterator<Item = MeterSubtype> + '_ {
        self.categories.iter().map(|(subtype, _)| *subtype)
    }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::meter::types::HierarchyLevel;

    fn classify_type(meter_type: &str) -> Classification {
        MeterClassifier::default().classify(&MeterRecord::new("Z1-01", meter_type))
    }

    #[test]
    fn real_type_tags_classify() {
        assert_eq!(classify_type("Main BULK").subtype, MeterSubtype::MainBulk);
        assert_eq!(classify_type("Zone Bulk").subtype, MeterSubtype::ZoneBulk);
        assert_eq!(classify_type("Residential (Villa)").subtype, MeterSubtype::Villa);
        assert_eq!(classify_type("D_Building_Bulk").subtype, MeterSubtype::BuildingBulk);
        assert_eq!(
            classify_type("Direct Connection").subtype,
            MeterSubtype::DirectConnection
        );
    }

    #[test]
    fn zone_types_match_case_insensitively_by_substring() {
        assert_eq!(classify_type("Zone_Bulk_West").level, HierarchyLevel::L2);
        assert_eq!(classify_type("zone bulk").level, HierarchyLevel::L2);
        assert_eq!(classify_type("  ZONE BULK  ").level, HierarchyLevel::L2);
    }

    #[test]
    fn empty_and_whitespace_types_are_unknown() {
        assert!(classify_type("").is_unknown());
        assert!(classify_type("   \t ").is_unknown());
    }

    #[test]
    fn unrecognized_type_is_unknown() {
        assert!(classify_type("Irrigation Control").is_unknown());
    }

    #[test]
    fn multiple_keywords_resolve_by_priority() {
        // main source beats zone bulk
        assert_eq!(classify_type("Main Zone Bulk").subtype, MeterSubtype::MainBulk);
        // zone bulk beats villa
        assert_eq!(classify_type("Zone Villa Feed").subtype, MeterSubtype::ZoneBulk);
        // direct connection beats building bulk
        assert_eq!(
            classify_type("Building Direct Connection").subtype,
            MeterSubtype::DirectConnection
        );
        // villa beats building
        assert_eq!(classify_type("Villa Building").subtype, MeterSubtype::Villa);
    }

    #[test]
    fn label_markers_override_type() {
        let classifier = MeterClassifier::default();
        let nama = MeterRecord::new("Main Bulk (NAMA)", "Irrigation Control");
        let account = MeterRecord::new("C43659", "");
        assert_eq!(classifier.classify(&nama).level, HierarchyLevel::L1);
        assert_eq!(classifier.classify(&account).level, HierarchyLevel::L1);
    }

    #[test]
    fn label_markers_are_case_sensitive() {
        let record = MeterRecord::new("nama street", "Irrigation Control");
        assert!(MeterClassifier::default().classify(&record).is_unknown());
    }

    #[test]
    fn apartments_are_unknown_in_canonical_model() {
        assert!(classify_type("Residential (Apart)").is_unknown());
    }

    #[test]
    fn extended_model_recognises_apartments_before_building_bulk() {
        let classifier =
            MeterClassifier::new(&ClassifierConfig::default(), HierarchyModel::ExtendedL4);
        assert_eq!(
            classifier.classify_type("Residential (Apart)"),
            MeterSubtype::Apartment
        );
        assert_eq!(
            classifier.classify_type("D_Building_Common"),
            MeterSubtype::Apartment
        );
        assert_eq!(
            classifier.classify_type("D_Building_Bulk"),
            MeterSubtype::BuildingBulk
        );
        assert_eq!(
            MeterClassifier::default().classify_type("D_Building_Common"),
            MeterSubtype::BuildingBulk
        );
    }

    #[test]
    fn blank_keywords_never_match() {
        let config = ClassifierConfig {
            zone_bulk: vec!["".to_string(), "   ".to_string()],
            ..ClassifierConfig::default()
        };
        let classifier = MeterClassifier::new(&config, HierarchyModel::Canonical);
        assert_eq!(classifier.classify_type("Irrigation"), MeterSubtype::Unknown);
    }

    #[test]
    fn priority_order_is_fixed() {
        let canonical: Vec<_> = MeterClassifier::default().priority().collect();
        assert_eq!(
            canonical,
            vec![
                MeterSubtype::MainBulk,
                MeterSubtype::ZoneBulk,
                MeterSubtype::DirectConnection,
                MeterSubtype::Villa,
                MeterSubtype::BuildingBulk,
            ]
        );
    }

    const FRAGMENTS: [&str; 14] = [
        "main", "Zone", "bulk", "villa", "Building", "direct", "connection", "residential",
        "retail", "(", ")", "_", " ", "\t",
    ];

    fn random_type(rng: &mut StdRng) -> String {
        let parts = rng.random_range(0..5);
        let mut out = String::new();
        for _ in 0..parts {
            let fragment = FRAGMENTS[rng.random_range(0..FRAGMENTS.len())];
            if rng.random_bool(0.5) {
                out.push_str(&fragment.to_uppercase());
            } else {
                out.push_str(fragment);
            }
        }
        out
    }

    /// Oracle: first category, in priority order, with a contained keyword.
    fn expected_subtype(config: &ClassifierConfig, meter_type: &str) -> MeterSubtype {
        let normalized = meter_type.trim().to_lowercase();
        let ordered = [
            (MeterSubtype::MainBulk, &config.main_source),
            (MeterSubtype::ZoneBulk, &config.zone_bulk),
            (MeterSubtype::DirectConnection, &config.direct_connection),
            (MeterSubtype::Villa, &config.villa),
            (MeterSubtype::BuildingBulk, &config.building_bulk),
        ];
        if normalized.is_empty() {
            return MeterSubtype::Unknown;
        }
        ordered
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|k| normalized.contains(&k.to_lowercase()))
            })
            .map_or(MeterSubtype::Unknown, |(subtype, _)| *subtype)
    }

    #[test]
    fn classification_is_total_and_follows_priority_for_random_types() {
        let config = ClassifierConfig::default();
        let classifier = MeterClassifier::new(&config, HierarchyModel::Canonical);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..2_000 {
            let meter_type = random_type(&mut rng);
            let record = MeterRecord::new("Z9-99", meter_type.clone());
            let classification = classifier.classify(&record);

            assert_eq!(classification.level, classification.subtype.level());
            assert_ne!(classification.level, HierarchyLevel::L4);
            assert_eq!(
                classification.subtype,
                expected_subtype(&config, &meter_type),
                "type {meter_type:?}"
            );
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = MeterClassifier::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let record = MeterRecord::new("Z9-99", random_type(&mut rng));
            assert_eq!(classifier.classify(&record), classifier.classify(&record));
        }
    }
}
