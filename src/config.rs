//! Configuration module
//!
//! Precedence: CLI flag > environment variable > model metadata > default.

use std::path::PathBuf;
use std::str::FromStr;

use crate::api::cli::Cli;
use crate::error::{ScoreError, ScoreResult};
use crate::logic::features::ScalingPolicy;
use crate::logic::model::{LoadOptions, ModelMetadata, ThresholdConfig};

/// Source of min-max parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Fit on the batch being scored
    #[default]
    Batch,
    /// Use the `normalization` block saved with the model
    Training,
}

impl FromStr for ScalingMode {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(ScalingMode::Batch),
            "training" => Ok(ScalingMode::Training),
            other => Err(ScoreError::InvalidConfig(format!(
                "unknown scaling mode '{}' (expected 'batch' or 'training')",
                other
            ))),
        }
    }
}

/// Scorer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact (`.onnx` or dense `.json`)
    pub model_path: PathBuf,

    /// Explicit metadata sidecar
    pub metadata_path: Option<PathBuf>,

    /// Expected SHA-256 of the model file
    pub model_sha256: Option<String>,

    /// Threshold set by flag or environment; metadata/default otherwise
    pub threshold: Option<f32>,

    pub scaling: ScalingMode,

    /// Emit `reconstructionError` alongside each verdict
    pub include_error: bool,
}

impl Config {
    /// Build from parsed arguments; clap has already merged the environment
    pub fn from_cli(cli: &Cli) -> ScoreResult<Self> {
        let scaling = match cli.scaling.as_deref() {
            Some(raw) => raw.parse()?,
            None => ScalingMode::default(),
        };

        let config = Self {
            model_path: cli.model.clone(),
            metadata_path: cli.metadata.clone(),
            model_sha256: cli.model_sha256.clone(),
            threshold: cli.threshold,
            scaling,
            include_error: cli.include_error,
        };

        if let Some(t) = config.threshold {
            ThresholdConfig::new(t)?;
        }

        Ok(config)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            metadata_path: self.metadata_path.clone(),
            expected_sha256: self.model_sha256.clone(),
        }
    }

    /// Final threshold once model metadata is known
    pub fn threshold_for(&self, metadata: &ModelMetadata) -> ScoreResult<ThresholdConfig> {
        match self.threshold.or(metadata.threshold) {
            Some(t) => ThresholdConfig::new(t),
            None => Ok(ThresholdConfig::default()),
        }
    }

    pub fn scaling_policy(&self, metadata: &ModelMetadata) -> ScoreResult<ScalingPolicy> {
        match self.scaling {
            ScalingMode::Batch => Ok(ScalingPolicy::FitPerBatch),
            ScalingMode::Training => metadata
                .normalization
                .clone()
                .map(ScalingPolicy::Fixed)
                .ok_or_else(|| {
                    ScoreError::ModelLoadError(
                        "training scaling requested but model metadata has no normalization block"
                            .to_string(),
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::logic::features::ScalingParameters;
    use clap::Parser;

    #[test]
    fn test_scaling_mode_parse() {
        assert_eq!("batch".parse::<ScalingMode>().unwrap(), ScalingMode::Batch);
        assert_eq!(" Training ".parse::<ScalingMode>().unwrap(), ScalingMode::Training);
        assert!(matches!("rolling".parse::<ScalingMode>(), Err(ScoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_cli_threshold_beats_metadata() {
        let cli = Cli::try_parse_from(["anomaly-scorer", "--threshold", "0.2", "[[1]]"]).unwrap();
        let config = Config::from_cli(&cli).unwrap();
        let metadata = ModelMetadata {
            threshold: Some(0.05),
            ..Default::default()
        };

        assert_eq!(config.threshold_for(&metadata).unwrap().threshold, 0.2);
    }

    #[test]
    fn test_metadata_threshold_beats_default() {
        let config = Config {
            model_path: PathBuf::from("m.json"),
            metadata_path: None,
            model_sha256: None,
            threshold: None,
            scaling: ScalingMode::Batch,
            include_error: false,
        };
        let metadata = ModelMetadata {
            threshold: Some(0.05),
            ..Default::default()
        };

        assert_eq!(config.threshold_for(&metadata).unwrap().threshold, 0.05);
        assert_eq!(
            config.threshold_for(&ModelMetadata::default()).unwrap().threshold,
            constants::DEFAULT_THRESHOLD
        );
    }

    #[test]
    fn test_reject_negative_threshold() {
        let cli = Cli::try_parse_from(["anomaly-scorer", "--threshold", "-1", "[[1]]"]).unwrap();
        assert!(matches!(Config::from_cli(&cli), Err(ScoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_training_scaling_requires_normalization() {
        let cli = Cli::try_parse_from(["anomaly-scorer", "--scaling", "training", "[[1]]"]).unwrap();
        let config = Config::from_cli(&cli).unwrap();

        assert!(matches!(
            config.scaling_policy(&ModelMetadata::default()),
            Err(ScoreError::ModelLoadError(_))
        ));

        let params = ScalingParameters {
            min_vals: vec![0.0],
            max_vals: vec![1.0],
        };
        let metadata = ModelMetadata {
            normalization: Some(params.clone()),
            ..Default::default()
        };
        assert_eq!(config.scaling_policy(&metadata).unwrap(), ScalingPolicy::Fixed(params));
    }
}
