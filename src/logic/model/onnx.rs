//! ONNX Runtime backend
//!
//! Load và chạy ONNX autoencoder. The whole batch goes through one
//! `session.run` call as a `(records, features)` tensor.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::inference::Autoencoder;
use crate::error::{ScoreError, ScoreResult};

/// Autoencoder exported to ONNX
pub struct OnnxAutoencoder {
    session: Mutex<Session>,
    output_name: String,
    input_dim: Option<usize>,
}

/// Feature width from a declared input shape: the last axis, when fixed.
///
/// ONNX marks dynamic axes as `-1` (or `0` for symbolic ones).
fn fixed_feature_dim(shape: &[i64]) -> Option<usize> {
    shape
        .last()
        .copied()
        .filter(|&d| d > 0)
        .and_then(|d| usize::try_from(d).ok())
}

impl OnnxAutoencoder {
    /// Load ONNX model từ file
    pub fn load(model_path: &Path) -> ScoreResult<Self> {
        let session = Session::builder()
            .map_err(|e| ScoreError::ModelLoadError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScoreError::ModelLoadError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ScoreError::ModelLoadError(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| ScoreError::ModelLoadError("No output defined".to_string()))?;

        let input_dim = session
            .inputs()
            .first()
            .and_then(|i| i.dtype().tensor_shape())
            .and_then(|shape| fixed_feature_dim(shape));

        log::debug!(
            "ONNX session ready, reading output '{}', input width {:?}",
            output_name,
            input_dim
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            input_dim,
        })
    }
}

impl Autoencoder for OnnxAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        let (records, features) = input.dim();

        let flat: Vec<f32> = input.iter().copied().collect();
        let input_tensor = Tensor::from_array(([records, features], flat))
            .map_err(|e| ScoreError::ModelInferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ScoreError::ModelInferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ScoreError::ModelInferenceError("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScoreError::ModelInferenceError(format!("Extract error: {}", e)))?;

        let data = output_tensor.1;
        if data.len() != records * features {
            return Err(ScoreError::ModelInferenceError(format!(
                "Model returned {} values for a {}x{} batch",
                data.len(),
                records,
                features
            )));
        }

        Array2::from_shape_vec((records, features), data.to_vec())
            .map_err(|e| ScoreError::ModelInferenceError(format!("Array error: {}", e)))
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_onnx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"definitely not a protobuf").unwrap();

        assert!(matches!(OnnxAutoencoder::load(&path), Err(ScoreError::ModelLoadError(_))));
    }

    #[test]
    fn test_fixed_feature_dim_from_batch_shape() {
        // (batch, features) with a dynamic batch axis
        assert_eq!(fixed_feature_dim(&[-1, 32]), Some(32));
        assert_eq!(fixed_feature_dim(&[8, 2]), Some(2));
        assert_eq!(fixed_feature_dim(&[5]), Some(5));
    }

    #[test]
    fn test_dynamic_feature_dim_is_unknown() {
        assert_eq!(fixed_feature_dim(&[-1, -1]), None);
        assert_eq!(fixed_feature_dim(&[-1, 0]), None);
        assert_eq!(fixed_feature_dim(&[]), None);
    }
}
