use crate::core::classify::{ClassificationTable, Favorability, RadiusRule, ThresholdRule};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Where a currency sits on the map and how it is labelled.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LocationMeta {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl LocationMeta {
    /// Caption name, e.g. "Brazilian Real"; falls back to the place name.
    pub fn currency_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyConfig {
    #[serde(flatten)]
    pub location: LocationMeta,
    /// CSV file name relative to `data_dir`.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub below: Option<Favorability>,
    #[serde(default)]
    pub at_or_above: Option<Favorability>,
    #[serde(default)]
    pub radius_compression: Option<RadiusRule>,
    #[serde(default)]
    pub label_decimals: Option<usize>,
}

impl CurrencyConfig {
    /// `{CODE}_{Full-Name}.csv` unless a file is configured.
    pub fn file_name(&self) -> String {
        self.file.clone().unwrap_or_else(|| {
            format!(
                "{}_{}.csv",
                self.location.code,
                self.location.currency_name().replace(' ', "-")
            )
        })
    }

    /// Layers this entry's overrides on the rule already known for its code.
    pub fn threshold_rule(&self, inherited: Option<ThresholdRule>) -> Option<ThresholdRule> {
        let mut rule = match (self.threshold, inherited) {
            (Some(threshold), Some(rule)) => ThresholdRule { threshold, ..rule },
            (Some(threshold), None) => ThresholdRule::new(threshold),
            (None, rule) => rule?,
        };
        if let Some(below) = self.below {
            rule.below = below;
        }
        if let Some(at_or_above) = self.at_or_above {
            rule.at_or_above = at_or_above;
        }
        Some(rule)
    }

    pub fn label_decimals(&self) -> usize {
        self.label_decimals.unwrap_or(1)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MapConfig {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: String,
    pub attribution: String,
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center: [20.0, 0.0],
            zoom: 2,
            tiles: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors &copy; CARTO".to_string(),
            height: 520,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Price-Data")
}

fn default_base() -> LocationMeta {
    LocationMeta {
        code: "USD".to_string(),
        name: "United States".to_string(),
        full_name: Some("US Dollar".to_string()),
        lat: 39.8283,
        lon: -98.5795,
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_base")]
    pub base: LocationMeta,
    pub currencies: Vec<CurrencyConfig>,
    #[serde(default)]
    pub map: MapConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "fxdash", "fxdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Loads a config file; a relative `data_dir` is taken from the file's directory.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        if config.data_dir.is_relative() {
            if let Some(parent) = path.as_ref().parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        debug!(data_dir = %config.data_dir.display(), "Successfully loaded config");
        Ok(config)
    }

    pub fn csv_path(&self, currency: &CurrencyConfig) -> PathBuf {
        self.data_dir.join(currency.file_name())
    }

    /// Built-in rules with every configured override applied on top.
    pub fn classification_table(&self) -> ClassificationTable {
        self.currencies
            .iter()
            .fold(ClassificationTable::builtin(), |table, currency| {
                let code = &currency.location.code;
                let table = match currency.threshold_rule(table.threshold_rule(code)) {
                    Some(rule) => table.with_threshold(code, rule),
                    None => table,
                };
                match currency.radius_compression {
                    Some(rule) => table.with_radius(code, rule),
                    None => table,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
data_dir: "/srv/fx"
currencies:
  - code: "BRL"
    name: "Brazil"
    full_name: "Brazilian Real"
    lat: -14.2350
    lon: -51.9253
    threshold: 25.0
  - code: "EUR"
    name: "Europe"
    full_name: "European Euro"
    lat: 54.5260
    lon: 15.2551
    threshold: 100.0
    radius_compression:
      cap: 160.0
      divisor: 4.0
  - code: "GBP"
    name: "United Kingdom"
    file: "pounds.csv"
    lat: 55.3781
    lon: -3.4360
    threshold: 120.0
    below: red
    at_or_above: green
    label_decimals: 3
"#;

    #[test]
    fn test_config_deserialization() {
        let config: AppConfig = serde_yaml::from_str(YAML).expect("Failed to deserialize");
        assert_eq!(config.currencies.len(), 3);
        assert_eq!(config.data_dir, PathBuf::from("/srv/fx"));
        assert!(!config.strict);
        assert!(config.output.is_none());
        assert_eq!(config.base.code, "USD");
        assert_eq!(config.base.name, "United States");
        assert_eq!(config.map, MapConfig::default());

        let brl = &config.currencies[0];
        assert_eq!(brl.location.code, "BRL");
        assert_eq!(brl.location.currency_name(), "Brazilian Real");
        assert_eq!(brl.file_name(), "BRL_Brazilian-Real.csv");
        assert_eq!(brl.label_decimals(), 1);
        assert_eq!(
            config.csv_path(brl),
            PathBuf::from("/srv/fx/BRL_Brazilian-Real.csv")
        );

        let eur = &config.currencies[1];
        assert_eq!(
            eur.radius_compression,
            Some(RadiusRule {
                cap: 160.0,
                divisor: 4.0
            })
        );

        let gbp = &config.currencies[2];
        assert_eq!(gbp.file_name(), "pounds.csv");
        assert_eq!(gbp.location.currency_name(), "United Kingdom");
        assert_eq!(gbp.label_decimals(), 3);
        let gbp_rule = gbp.threshold_rule(None).unwrap();
        assert_eq!(gbp_rule.threshold, 120.0);
        assert_eq!(gbp_rule.below, Favorability::Red);
        assert_eq!(gbp_rule.at_or_above, Favorability::Green);
    }

    #[test]
    fn test_classification_table_from_config() {
        let config: AppConfig = serde_yaml::from_str(YAML).unwrap();
        let table = config.classification_table();

        assert_eq!(table.favorability("BRL", 20.0), Favorability::Green);
        assert_eq!(table.favorability("EUR", 117.6), Favorability::Red);
        assert_eq!(table.favorability("GBP", 126.0), Favorability::Green);
        // Codes missing from the config still use the built-in rules
        assert_eq!(table.favorability("JPY", 0.5), Favorability::Green);
        assert_eq!(table.favorability("CHF", 0.5), Favorability::Gray);
        assert!((table.marker_radius("EUR", 20.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_entries_without_rules_keep_builtin_behavior() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
currencies:
  - code: "EUR"
    name: "Europe"
    lat: 54.5260
    lon: 15.2551
  - code: "ZAR"
    name: "South Africa"
    lat: -30.5595
    lon: 22.9375
    at_or_above: gray
  - code: "CHF"
    name: "Switzerland"
    lat: 46.8182
    lon: 8.2275
"#,
        )
        .unwrap();
        let table = config.classification_table();

        assert!(config.currencies[0].threshold.is_none());
        assert_eq!(table.favorability("EUR", 99.0), Favorability::Green);
        assert_eq!(table.favorability("EUR", 117.6), Favorability::Red);
        assert!((table.marker_radius("EUR", 20.0) - 9.0).abs() < 1e-9);

        // Only the color is overridden; the built-in threshold of 10 stays
        assert_eq!(table.favorability("ZAR", 5.5), Favorability::Green);
        assert_eq!(table.favorability("ZAR", 12.0), Favorability::Gray);

        assert_eq!(table.favorability("CHF", 110.0), Favorability::Gray);
        assert_eq!(table.favorability("JPY", 0.667), Favorability::Green);
    }

    #[test]
    fn test_threshold_overrides_builtin_value() {
        let config: AppConfig = serde_yaml::from_str(
            "currencies:\n  - code: BRL\n    name: Brazil\n    lat: 0.0\n    lon: 0.0\n    threshold: 15.0\n",
        )
        .unwrap();
        let table = config.classification_table();
        assert_eq!(table.favorability("BRL", 20.0), Favorability::Red);
        assert_eq!(table.favorability("BRL", 10.0), Favorability::Green);
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "data_dir: prices\ncurrencies: []\nmap:\n  center: [0.0, 0.0]\n  zoom: 3\n  tiles: t\n  attribution: a\n  height: 400\n",
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.data_dir, dir.path().join("prices"));
        assert_eq!(config.map.zoom, 3);
        assert_eq!(config.map.height, 400);
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let err = AppConfig::load_from_path("/nonexistent/fxdash.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
