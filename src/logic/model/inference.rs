//! Inference Engine - Model abstraction & loading
//!
//! The scorer only sees the `Autoencoder` trait.
//! Tách riêng backend (ONNX, dense JSON) để dễ swap model.

use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::dense::DenseAutoencoder;
use super::guard;
use super::onnx::OnnxAutoencoder;
use crate::error::{ScoreError, ScoreResult};
use crate::logic::features::ScalingParameters;

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// A trained model that maps a normalized batch to its reconstruction
pub trait Autoencoder {
    /// Feature count the model was trained on, if it declares one
    fn input_dim(&self) -> Option<usize>;

    /// Reconstruct every row of `input`; output must have the same shape
    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>>;

    /// Short backend label for logs
    fn backend(&self) -> &'static str;
}

impl<M: Autoencoder + ?Sized> Autoencoder for Box<M> {
    fn input_dim(&self) -> Option<usize> {
        (**self).input_dim()
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        (**self).reconstruct(input)
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata sidecar (`<model>.json`), all fields optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub input_dim: Option<usize>,
    /// Threshold calibrated at training time
    #[serde(default)]
    pub threshold: Option<f32>,
    /// Training-time scaler
    #[serde(default)]
    pub normalization: Option<ScalingParameters>,
}

/// Loaded model with its metadata
pub struct LoadedModel {
    pub model: Box<dyn Autoencoder>,
    pub metadata: ModelMetadata,
    pub path: PathBuf,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("backend", &self.model.backend())
            .field("input_dim", &self.model.input_dim())
            .field("metadata", &self.metadata)
            .field("path", &self.path)
            .finish()
    }
}

/// Options controlling how the artifact is loaded
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit metadata path; otherwise `<model>.json` is tried
    pub metadata_path: Option<PathBuf>,
    /// Expected SHA-256 (hex) of the model file
    pub expected_sha256: Option<String>,
}

// ============================================================================
// MODEL LOADING
// ============================================================================

/// Load metadata từ JSON file
pub fn load_metadata(metadata_path: &Path) -> ScoreResult<ModelMetadata> {
    let content = std::fs::read_to_string(metadata_path).map_err(|e| {
        ScoreError::ModelLoadError(format!(
            "Failed to read metadata {}: {}",
            metadata_path.display(),
            e
        ))
    })?;

    let metadata: ModelMetadata = serde_json::from_str(&content).map_err(|e| {
        ScoreError::ModelLoadError(format!(
            "Failed to parse metadata {}: {}",
            metadata_path.display(),
            e
        ))
    })?;

    if let Some(norm) = &metadata.normalization {
        norm.validate()
            .map_err(|e| ScoreError::ModelLoadError(format!("Bad normalization block: {}", e)))?;
    }

    Ok(metadata)
}

fn sidecar_path(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Load a model artifact, dispatching on the file extension
pub fn load_model(model_path: &Path, options: &LoadOptions) -> ScoreResult<LoadedModel> {
    log::info!("Loading model from: {}", model_path.display());

    if !model_path.exists() {
        return Err(ScoreError::ModelLoadError(format!(
            "Model not found: {}",
            model_path.display()
        )));
    }

    if let Some(expected) = &options.expected_sha256 {
        guard::verify_checksum(model_path, expected)?;
    }

    let extension = model_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let model: Box<dyn Autoencoder> = match extension.as_deref() {
        Some("onnx") => Box::new(OnnxAutoencoder::load(model_path)?),
        Some("json") => Box::new(DenseAutoencoder::load(model_path)?),
        other => {
            return Err(ScoreError::ModelLoadError(format!(
                "Unsupported model format: {}",
                other.unwrap_or("<none>")
            )))
        }
    };

    let metadata = match &options.metadata_path {
        Some(path) => load_metadata(path)?,
        None => {
            let path = sidecar_path(model_path);
            if path.exists() {
                load_metadata(&path)?
            } else {
                ModelMetadata::default()
            }
        }
    };

    if let (Some(declared), Some(actual)) = (metadata.input_dim, model.input_dim()) {
        if declared != actual {
            return Err(ScoreError::ModelLoadError(format!(
                "Metadata declares {} features but model takes {}",
                declared, actual
            )));
        }
    }

    log::info!(
        "{} model loaded (input_dim: {:?})",
        model.backend(),
        model.input_dim().or(metadata.input_dim)
    );

    Ok(LoadedModel {
        model,
        metadata,
        path: model_path.to_path_buf(),
    })
}

impl LoadedModel {
    /// Input width from the model itself, else from metadata
    pub fn input_dim(&self) -> Option<usize> {
        self.model.input_dim().or(self.metadata.input_dim)
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
