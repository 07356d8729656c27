//! Scoring tests - pipeline properties with in-memory autoencoders

use ndarray::{array, Array2, ArrayView2};
use proptest::prelude::*;

use super::{reconstruction_errors, score, ReconstructionScorer};
use crate::error::{ScoreError, ScoreResult};
use crate::logic::features::{Batch, NormalizedBatch, ScalingParameters, ScalingPolicy};
use crate::logic::model::{Autoencoder, ThresholdConfig};

/// Reconstructs the training range `[0, 0.5]` with +0.01 noise and
/// saturates above it, like an autoencoder that never saw large values.
struct BaselineAutoencoder {
    dim: usize,
}

impl Autoencoder for BaselineAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        Some(self.dim)
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        Ok(input.mapv(|v| v.min(0.5) + 0.01))
    }

    fn backend(&self) -> &'static str {
        "baseline"
    }
}

/// Emits the wrong number of columns
struct TruncatingAutoencoder;

impl Autoencoder for TruncatingAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        Ok(Array2::zeros((input.nrows(), input.ncols() + 1)))
    }

    fn backend(&self) -> &'static str {
        "truncating"
    }
}

/// Emits NaN for every value
struct NanAutoencoder;

impl Autoencoder for NanAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn reconstruct(&self, input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        Ok(input.mapv(|_| f32::NAN))
    }

    fn backend(&self) -> &'static str {
        "nan"
    }
}

/// Fails the forward pass
struct FailingAutoencoder;

impl Autoencoder for FailingAutoencoder {
    fn input_dim(&self) -> Option<usize> {
        None
    }

    fn reconstruct(&self, _input: ArrayView2<'_, f32>) -> ScoreResult<Array2<f32>> {
        Err(ScoreError::ModelInferenceError("runtime crashed".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

fn batch(rows: &[&[f32]]) -> Batch {
    Batch::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

fn default_scorer<M: Autoencoder>(model: M) -> ReconstructionScorer<M> {
    ReconstructionScorer::new(model, ScalingPolicy::FitPerBatch, ThresholdConfig::default())
}

#[test]
fn test_mse_per_record() {
    let input = array![[0.0, 0.0], [1.0, 1.0]];
    let reconstructed = array![[0.1, 0.3], [1.0, 0.0]];

    let errors = reconstruction_errors(input.view(), reconstructed.view()).unwrap();

    assert!((errors[0] - 0.05).abs() < 1e-6);
    assert!((errors[1] - 0.5).abs() < 1e-6);
}

#[test]
fn test_flags_outlier_end_to_end() {
    let scorer = default_scorer(BaselineAutoencoder { dim: 2 });
    let b = batch(&[&[0.0, 0.0], &[0.0, 0.0], &[10.0, 10.0]]);

    let verdicts = scorer.score_batch(&b).unwrap();

    let flags: Vec<(usize, bool)> = verdicts.iter().map(|v| (v.node_index, v.anomalous)).collect();
    assert_eq!(flags, vec![(0, false), (1, false), (2, true)]);
}

#[test]
fn test_deterministic() {
    let scorer = default_scorer(BaselineAutoencoder { dim: 3 });
    let b = batch(&[&[1.0, 2.0, 3.0], &[1.5, 2.5, 9.0], &[0.0, 2.0, 3.1]]);

    let first = scorer.score_batch(&b).unwrap();
    let second = scorer.score_batch(&b).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_reject_ragged_before_scoring() {
    let result = Batch::from_rows(vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]]);
    assert!(matches!(result, Err(ScoreError::InvalidBatchShape(_))));
}

#[test]
fn test_reject_model_dim_mismatch() {
    let scorer = default_scorer(BaselineAutoencoder { dim: 3 });
    let result = scorer.score_batch(&batch(&[&[1.0, 2.0]]));

    assert!(matches!(result, Err(ScoreError::InvalidBatchShape(_))));
}

#[test]
fn test_mismatched_reconstruction_is_inference_error() {
    let scorer = default_scorer(TruncatingAutoencoder);
    let result = scorer.score_batch(&batch(&[&[1.0, 2.0], &[3.0, 4.0]]));

    assert!(matches!(result, Err(ScoreError::ModelInferenceError(_))));
}

#[test]
fn test_nan_reconstruction_is_inference_error() {
    let scorer = default_scorer(NanAutoencoder);
    let result = scorer.score_batch(&batch(&[&[1.0], &[2.0]]));

    assert!(matches!(result, Err(ScoreError::ModelInferenceError(_))));
}

#[test]
fn test_forward_failure_yields_no_verdicts() {
    let scorer = default_scorer(FailingAutoencoder);
    let result = scorer.score_batch(&batch(&[&[1.0], &[2.0]]));

    assert!(matches!(result, Err(ScoreError::ModelInferenceError(_))));
}

#[test]
fn test_training_scaling_changes_verdicts() {
    // Under training-time scaling [0, 100], a value of 10 stays in range.
    let training = ScalingPolicy::Fixed(ScalingParameters {
        min_vals: vec![0.0, 0.0],
        max_vals: vec![100.0, 100.0],
    });
    let scorer = ReconstructionScorer::new(
        BaselineAutoencoder { dim: 2 },
        training,
        ThresholdConfig::default(),
    );

    let verdicts = scorer.score_batch(&batch(&[&[0.0, 0.0], &[0.0, 0.0], &[10.0, 10.0]])).unwrap();

    assert!(verdicts.iter().all(|v| !v.anomalous));
}

#[test]
fn test_score_reports_errors() {
    let normalized = NormalizedBatch::from_array(array![[0.0], [1.0]]);
    let verdicts = score(&BaselineAutoencoder { dim: 1 }, &normalized, ThresholdConfig::default()).unwrap();

    let first = verdicts[0].reconstruction_error.unwrap();
    let second = verdicts[1].reconstruction_error.unwrap();
    assert!((first - 0.0001).abs() < 1e-6);
    assert!((second - 0.2401).abs() < 1e-4);
}

fn rows_strategy() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..5, 1usize..40).prop_flat_map(|(dim, len)| {
        prop::collection::vec(prop::collection::vec(-1000.0f32..1000.0, dim), len)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_shape_preserved(rows in rows_strategy()) {
        let dim = rows[0].len();
        let len = rows.len();
        let b = Batch::from_rows(rows).unwrap();
        let verdicts = default_scorer(BaselineAutoencoder { dim }).score_batch(&b).unwrap();

        prop_assert_eq!(verdicts.len(), len);
        for (i, v) in verdicts.iter().enumerate() {
            prop_assert_eq!(v.node_index, i);
        }
    }

    #[test]
    fn prop_normalized_values_finite(rows in rows_strategy()) {
        let b = Batch::from_rows(rows).unwrap();
        let (_, normalized) = ScalingPolicy::FitPerBatch.apply(&b, None).unwrap();

        prop_assert!(normalized.view().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn prop_threshold_monotone(rows in rows_strategy(), low in 0.0f32..0.3, delta in 0.0f32..0.3) {
        let dim = rows[0].len();
        let b = Batch::from_rows(rows).unwrap();
        let high = low + delta;

        let strict = ReconstructionScorer::new(
            BaselineAutoencoder { dim },
            ScalingPolicy::FitPerBatch,
            ThresholdConfig::new(low).unwrap(),
        );
        let relaxed = ReconstructionScorer::new(
            BaselineAutoencoder { dim },
            ScalingPolicy::FitPerBatch,
            ThresholdConfig::new(high).unwrap(),
        );

        let before = strict.score_batch(&b).unwrap();
        let after = relaxed.score_batch(&b).unwrap();

        for (s, r) in before.iter().zip(&after) {
            // relaxing may only clear flags
            prop_assert!(!r.anomalous || s.anomalous);
        }
    }
}
