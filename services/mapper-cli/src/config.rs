//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use layer_controller::ControllerSettings;
use mapper_api::ClientConfig;
use methane_common::{Basemap, FactoryRecord, LayerKind, Threshold, ViewParameters};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Top-level configuration, normally `config/mapper.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub api: ApiSection,
    pub defaults: DefaultsSection,
    pub prediction: PredictionSection,
    /// YAML or JSON list of factory sites, chosen by extension.
    pub factories_path: Option<PathBuf>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            api: ApiSection::default(),
            defaults: DefaultsSection::default(),
            prediction: PredictionSection::default(),
            factories_path: Some(PathBuf::from("config/factories.yaml")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Parameters the dashboard opens with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub layer: LayerKind,
    pub threshold: u16,
    pub basemap: Basemap,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            layer: LayerKind::default(),
            threshold: Threshold::DEFAULT,
            basemap: Basemap::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSection {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub default_date: NaiveDate,
}

impl Default for PredictionSection {
    fn default() -> Self {
        let settings = ControllerSettings::default();
        Self {
            center: settings.prediction_center,
            default_date: settings.default_prediction_date,
        }
    }
}

impl MapperConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: MapperConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file means defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_file(path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("api.base_url must not be empty");
        }
        if self.api.request_timeout_secs == 0 {
            bail!("api.request_timeout_secs must be greater than 0");
        }
        if self.api.connect_timeout_secs == 0 {
            bail!("api.connect_timeout_secs must be greater than 0");
        }
        Threshold::new(self.defaults.threshold).context("Invalid defaults.threshold")?;
        let [lat, lon] = self.prediction.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            bail!("prediction.center [{}, {}] is not a valid coordinate", lat, lon);
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
            prediction_center: self.prediction.center,
            default_prediction_date: self.prediction.default_date,
        }
    }

    pub fn initial_parameters(&self) -> Result<ViewParameters> {
        Ok(ViewParameters {
            active_layer: self.defaults.layer,
            threshold: Threshold::new(self.defaults.threshold)?,
            basemap: self.defaults.basemap,
            ..ViewParameters::default()
        })
    }

    /// The configured factory catalog. A missing file yields an empty
    /// catalog, which surfaces as "no factory data" when loaded.
    pub fn factory_catalog(&self) -> Result<Vec<FactoryRecord>> {
        match &self.factories_path {
            Some(path) if path.exists() => load_factory_catalog(path),
            Some(path) => {
                warn!(path = %path.display(), "Factory catalog not found");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Read a factory catalog, YAML or JSON by file extension.
pub fn load_factory_catalog(path: &Path) -> Result<Vec<FactoryRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read factory catalog: {}", path.display()))?;

    let records = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => FactoryRecord::parse_json_catalog(&content)
            .with_context(|| format!("Failed to parse factory catalog: {}", path.display()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse factory catalog: {}", path.display()))?,
        other => bail!(
            "Unsupported factory catalog format {:?} (expected .yaml, .yml or .json)",
            other.unwrap_or("")
        ),
    };

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{fixtures, temp_file_with};

    #[test]
    fn test_full_config_parses() {
        let file = temp_file_with(
            r#"
api:
  base_url: "http://mapper.internal:8000/"
  request_timeout_secs: 5
  connect_timeout_secs: 2
defaults:
  layer: high_res_plumes
  threshold: 1950
  basemap: roadmap
prediction:
  center: [36.5, -119.5]
  default_date: "2024-01-15"
factories_path: "config/factories.yaml"
"#,
            ".yaml",
        );

        let config = MapperConfig::from_file(file.path()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.defaults.layer, LayerKind::HighResPlumes);
        assert_eq!(config.defaults.basemap, Basemap::Roadmap);
        assert_eq!(
            config.prediction.default_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        let settings = config.controller_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.prediction_center, [36.5, -119.5]);

        let params = config.initial_parameters().unwrap();
        assert_eq!(params.threshold.ppb(), 1950);
        assert_eq!(params.date, None);
        assert!(!params.show_factories);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let file = temp_file_with("api:\n  base_url: \"http://localhost:9000\"\n", ".yaml");
        let config = MapperConfig::from_file(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.defaults.threshold, 1920);
        assert_eq!(config.prediction.center, [20.0, 0.0]);
        assert_eq!(
            config.factories_path,
            Some(PathBuf::from("config/factories.yaml"))
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = MapperConfig::load_or_default("/nonexistent/mapper.yaml").unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MapperConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = MapperConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = MapperConfig::default();
        config.defaults.threshold = 1700;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_factory_catalog_by_extension() {
        let yaml = temp_file_with(fixtures::factories::YAML, ".yaml");
        let json = temp_file_with(fixtures::factories::JSON, ".json");

        let from_yaml = load_factory_catalog(yaml.path()).unwrap();
        let from_json = load_factory_catalog(json.path()).unwrap();

        assert_eq!(from_yaml.len(), 2);
        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml[1].kind, "Pipeline");
    }

    #[test]
    fn test_factory_catalog_unknown_extension() {
        let file = temp_file_with(fixtures::factories::JSON, ".csv");
        let err = load_factory_catalog(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported factory catalog format"));
    }

    #[test]
    fn test_missing_factory_catalog_is_empty() {
        let config = MapperConfig {
            factories_path: Some(PathBuf::from("/nonexistent/factories.yaml")),
            ..MapperConfig::default()
        };
        assert!(config.factory_catalog().unwrap().is_empty());
    }
}
