//! TOML-based calculator configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchyModel;
use crate::meter::MonthSchema;

/// Top-level calculator configuration parsed from TOML.
///
/// All sections have defaults matching the canonical hierarchy. Load from
/// TOML with [`CalculatorConfig::from_toml_file`] or use
/// [`CalculatorConfig::canonical`] for the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Month keys summed by every computation.
    #[serde(default)]
    pub months: MonthSchema,
    /// Hierarchy formula selection.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Expected meter counts for data-quality checks.
    #[serde(default)]
    pub expectations: ExpectationsConfig,
    /// Keyword lists used by the meter classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    /// `"canonical"` or `"extended_l4"`.
    pub model: HierarchyModel,
}

/// Expected meter counts. A mismatch raises a warning, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectationsConfig {
    pub main_source_count: usize,
    pub villa_count: usize,
    pub building_bulk_count: usize,
}

impl Default for ExpectationsConfig {
    fn default() -> Self {
        Self {
            main_source_count: 1,
            villa_count: 125,
            building_bulk_count: 21,
        }
    }
}

/// Classifier keywords per category.
///
/// Type keywords are matched as lowercase substrings of the trimmed type
/// tag. Label overrides are matched case-sensitively against the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Label markers that force a meter to L1.
    pub label_overrides: Vec<String>,
    pub main_source: Vec<String>,
    pub zone_bulk: Vec<String>,
    pub direct_connection: Vec<String>,
    pub villa: Vec<String>,
    pub building_bulk: Vec<String>,
    /// Only consulted by the extended hierarchy model.
    pub apartment: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            label_overrides: strings(&["NAMA", "C43659"]),
            main_source: strings(&["Main", "Main_Bulk", "L1", "NAMA"]),
            zone_bulk: strings(&["Zone_Bulk", "Zone Bulk", "L2", "Zone"]),
            direct_connection: strings(&["Direct_Connection", "Direct Connection", "DC", "Direct"]),
            villa: strings(&["Villa", "L3_Villa", "L3"]),
            building_bulk: strings(&["Building_Bulk", "Building Bulk", "L3_Building", "Building"]),
            apartment: strings(&["Apart", "L4", "Building_Common", "Building Common"]),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"months.keys"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl CalculatorConfig {
    /// Returns the canonical L1 → L2 + DC → L3 configuration.
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Returns the configuration that treats apartments as a fourth level.
    pub fn extended_l4() -> Self {
        Self {
            hierarchy: HierarchyConfig {
                model: HierarchyModel::ExtendedL4,
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["canonical", "extended_l4"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "canonical" => Ok(Self::canonical()),
            "extended_l4" => Ok(Self::extended_l4()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let months = &self.months;
        if months.version == 0 {
            errors.push(ConfigError::new("months.version", "must be > 0"));
        }
        if months.is_empty() {
            errors.push(ConfigError::new("months.keys", "must not be empty"));
        }
        let mut seen = HashSet::new();
        for (i, key) in months.keys().iter().enumerate() {
            if key.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("months.keys[{i}]"),
                    "must not be blank",
                ));
            } else if !seen.insert(key.as_str()) {
                errors.push(ConfigError::new(
                    format!("months.keys[{i}]"),
                    format!("duplicate month key \"{key}\""),
                ));
            }
        }

        if self.expectations.main_source_count == 0 {
            errors.push(ConfigError::new(
                "expectations.main_source_count",
                "must be > 0",
            ));
        }

        let c = &self.classifier;
        let mut lists = vec![
            ("main_source", &c.main_source),
            ("zone_bulk", &c.zone_bulk),
            ("direct_connection", &c.direct_connection),
            ("villa", &c.villa),
            ("building_bulk", &c.building_bulk),
        ];
        if self.hierarchy.model.recognises_apartments() {
            lists.push(("apartment", &c.apartment));
        }
        for (name, keywords) in lists {
            if keywords.is_empty() {
                errors.push(ConfigError::new(
                    format!("classifier.{name}"),
                    "must list at least one keyword",
                ));
            }
            check_blank_entries(&format!("classifier.{name}"), keywords, &mut errors);
        }
        check_blank_entries("classifier.label_overrides", &c.label_overrides, &mut errors);

        errors
    }
}

fn check_blank_entries(field: &str, entries: &[String], errors: &mut Vec<ConfigError>) {
    for (i, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(ConfigError::new(format!("{field}[{i}]"), "must not be blank"));
        }
    }
}
