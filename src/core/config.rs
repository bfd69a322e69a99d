//! Pipeline configuration from YAML

use crate::core::selector::select_steps;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown step '{0}' in steps directive")]
    UnknownStep(String),

    #[error("steps directive is empty")]
    EmptyDirective,

    #[error("invalid price bounds: min_price {min} > max_price {max}")]
    PriceBounds { min: f64, max: f64 },
}

/// Top-level pipeline configuration.
///
/// Section layout mirrors the training project's config file: `main` holds
/// run identity and step selection, `etl` and `modeling` hold per-step
/// tunables. Read-only after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub main: MainConfig,
    pub etl: EtlConfig,
    pub modeling: ModelingConfig,
}

/// Run identity and step selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    /// Project identity, tagged onto every step's outputs.
    pub project_name: String,

    /// Experiment group identity, shared by all steps of one run.
    pub experiment_name: String,

    /// Step-selection directive: "all" or a comma-separated subset.
    pub steps: String,

    /// Repository locator for shared step components.
    pub components_repository: String,
}

/// Tunables for the download and cleaning steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Which raw sample file the download step fetches.
    pub sample: String,

    pub min_price: f64,
    pub max_price: f64,
}

/// Tunables for the split and training steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelingConfig {
    pub test_size: f64,
    pub val_size: f64,
    pub random_seed: i64,
    pub stratify_by: String,
    pub max_tfidf_features: i64,

    /// Free-form hyperparameter mapping, materialized to a JSON file for
    /// the training step.
    pub random_forest: Mapping,
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The steps directive is checked here so a typo fails before any step
    /// runs, rather than being silently skipped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        select_steps(&self.main.steps)?;

        if self.etl.min_price > self.etl.max_price {
            return Err(ConfigError::PriceBounds {
                min: self.etl.min_price,
                max: self.etl.max_price,
            });
        }

        Ok(())
    }

    /// Serialize the random forest hyperparameters to JSON, in the exact
    /// shape the training step expects to read back.
    pub fn hyperparameters_json(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(&self.modeling.random_forest)?;
        serde_json::to_string(&value)
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CONFIG: &str = r#"
main:
  project_name: "nyc_airbnb"
  experiment_name: "development"
  steps: "all"
  components_repository: "https://github.com/example/components"
etl:
  sample: "sample1.csv"
  min_price: 10
  max_price: 350
modeling:
  test_size: 0.2
  val_size: 0.2
  random_seed: 42
  stratify_by: "neighbourhood_group"
  max_tfidf_features: 5
  random_forest:
    n_estimators: 100
    max_depth: 15
    min_samples_split: 4
"#;
