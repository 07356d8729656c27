//! Scoring Module - Reconstruction error & thresholding
//!
//! Pipeline: Batch -> normalize -> autoencoder forward pass -> per-record
//! MSE -> threshold -> verdicts in input order. Any failure aborts the
//! whole batch.

pub mod verdict;

#[cfg(test)]
mod tests;

use ndarray::{Array1, ArrayView2, Axis};

use crate::error::{ScoreError, ScoreResult};
use crate::logic::features::{Batch, NormalizedBatch, ScalingPolicy};
use crate::logic::model::{Autoencoder, ThresholdConfig};

pub use verdict::AnomalyVerdict;

/// Mean squared error of each row against its reconstruction
pub fn reconstruction_errors(
    input: ArrayView2<'_, f32>,
    reconstructed: ArrayView2<'_, f32>,
) -> ScoreResult<Array1<f32>> {
    if input.dim() != reconstructed.dim() {
        return Err(ScoreError::ModelInferenceError(format!(
            "Reconstruction shape {:?} does not match input shape {:?}",
            reconstructed.dim(),
            input.dim()
        )));
    }
    if reconstructed.iter().any(|v| !v.is_finite()) {
        return Err(ScoreError::ModelInferenceError(
            "Reconstruction contains non-finite values".to_string(),
        ));
    }

    let diff = &input - &reconstructed;
    diff.mapv(|d| d * d)
        .mean_axis(Axis(1))
        .ok_or_else(|| ScoreError::ModelInferenceError("Records have no features".to_string()))
}

/// Score an already-normalized batch
pub fn score<M: Autoencoder + ?Sized>(
    model: &M,
    normalized: &NormalizedBatch,
    threshold: ThresholdConfig,
) -> ScoreResult<Vec<AnomalyVerdict>> {
    if normalized.is_empty() {
        return Err(ScoreError::EmptyBatch);
    }

    let input = normalized.view();
    let reconstructed = model.reconstruct(input)?;
    let errors = reconstruction_errors(input, reconstructed.view())?;

    let verdicts = errors
        .iter()
        .enumerate()
        .map(|(index, &error)| AnomalyVerdict::new(index, threshold.is_anomaly(error)).with_error(error))
        .collect();

    Ok(verdicts)
}

/// Scorer with its model, scaling policy and threshold injected up front
pub struct ReconstructionScorer<M> {
    model: M,
    scaling: ScalingPolicy,
    threshold: ThresholdConfig,
}

impl<M: Autoencoder> ReconstructionScorer<M> {
    pub fn new(model: M, scaling: ScalingPolicy, threshold: ThresholdConfig) -> Self {
        Self {
            model,
            scaling,
            threshold,
        }
    }

    /// Normalize and score a raw batch
    pub fn score_batch(&self, batch: &Batch) -> ScoreResult<Vec<AnomalyVerdict>> {
        let (_, normalized) = self.scaling.apply(batch, self.model.input_dim())?;
        let verdicts = score(&self.model, &normalized, self.threshold)?;

        let flagged = verdicts.iter().filter(|v| v.anomalous).count();
        log::info!(
            "Scored {} records with {} backend: {} anomalous (threshold {})",
            verdicts.len(),
            self.model.backend(),
            flagged,
            self.threshold.threshold
        );

        Ok(verdicts)
    }
}
