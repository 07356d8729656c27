//! Dense Autoencoder - feed-forward network from exported weights
//!
//! JSON layout mirrors a Keras `Sequential` of `Dense` layers:
//! `{"layers": [{"weights": [[..in x out..]], "bias": [..], "activation": "relu"}]}`.
//! The reference architecture is 32-16-8-16-32 relu with a sigmoid output.

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::inference::Autoencoder;
use crate::error::{ScoreError, ScoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

/// Serialized layer: kernel is `in x out`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseModelDef {
    pub layers: Vec<LayerDef>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    kernel: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

/// In-process autoencoder built from `Dense` layers
#[derive(Debug, Clone)]
pub struct DenseAutoencoder {
    layers: Vec<DenseLayer>,
    input_dim: usize,
}

impl DenseAutoencoder {
    /// Build and validate the network.
    ///
    /// Layer widths must chain and the output width must equal the input width.
    pub fn from_def(def: DenseModelDef) -> ScoreResult<Self> {
        let first = def
            .layers
            .first()
            .ok_or_else(|| ScoreError::ModelLoadError("Model has no layers".to_string()))?;
        let input_dim = first.weights.len();
        if input_dim == 0 {
            return Err(ScoreError::ModelLoadError("First layer has no inputs".to_string()));
        }

        let mut layers = Vec::with_capacity(def.layers.len());
        let mut width = input_dim;

        for (index, layer) in def.layers.into_iter().enumerate() {
            if layer.weights.len() != width {
                return Err(ScoreError::ModelLoadError(format!(
                    "Layer {} expects {} inputs, previous layer emits {}",
                    index,
                    layer.weights.len(),
                    width
                )));
            }
            let out = layer.bias.len();
            if out == 0 || layer.weights.iter().any(|row| row.len() != out) {
                return Err(ScoreError::ModelLoadError(format!(
                    "Layer {} kernel does not match bias width {}",
                    index, out
                )));
            }
            let finite = layer.weights.iter().flatten().chain(&layer.bias).all(|v| v.is_finite());
            if !finite {
                return Err(ScoreError::ModelLoadError(format!(
                    "Layer {} has non-finite parameters",
                    index
                )));
            }

            let flat: Vec<f32> = layer.weights.into_iter().flatten().collect();
            let kernel = Array2::from_shape_vec((width, out), flat)
                .map_err(|e| ScoreError::ModelLoadError(format!("Layer {} kernel: {}", index, e)))?;

            layers.push(DenseLayer {
                kernel,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            width = out;
        }

        if width != input_dim {
            return Err(ScoreError::ModelLoadError(format!(
                "Autoencoder output has {} features, input has {}",
                width, input_dim
            )));
        }

        Ok(Self { layers, input_dim })
    }

    pub fn load(path: &Path) -> ScoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScoreError::ModelLoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let def: DenseModelDef = serde_json::from_str(&content).map_err(|e| {
            ScoreError::ModelLoadError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let model = Self::from_def(def)?;
        log::debug!("Dense autoencoder with {} layers", model.layer_count());
        Ok(model)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl Autoencoder for DenseAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        Some(self.input_dim)
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        if input.ncols() != self.input_dim {
            return Err(ScoreError::ModelInferenceError(format!(
                "Input has {} features, model expects {}",
                input.ncols(),
                self.input_dim
            )));
        }

        let mut hidden = input.to_owned();
        for layer in &self.layers {
            let mut z = hidden.dot(&layer.kernel);
            z += &layer.bias;
            let activation = layer.activation;
            z.mapv_inplace(|x| activation.apply(x));
            hidden = z;
        }

        Ok(hidden)
    }

    fn backend(&self) -> &'static str {
        "dense"
    }
}
