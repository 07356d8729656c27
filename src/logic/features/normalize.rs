//! Min-max normalization
//!
//! Scales every feature column into `[0, 1]` using per-column min/max.
//! Columns with zero range map to `0` so no NaN reaches the model.

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

use super::batch::Batch;
use crate::error::{ScoreError, ScoreResult};

/// Normalization parameters (per-feature min and max)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub min_vals: Vec<f32>,
    pub max_vals: Vec<f32>,
}

impl ScalingParameters {
    /// Fit min/max on every column of the batch
    pub fn fit(batch: &Batch) -> Self {
        let view = batch.view();
        let min_vals = view.fold_axis(Axis(0), f32::INFINITY, |acc, &v| acc.min(v));
        let max_vals = view.fold_axis(Axis(0), f32::NEG_INFINITY, |acc, &v| acc.max(v));

        Self {
            min_vals: min_vals.to_vec(),
            max_vals: max_vals.to_vec(),
        }
    }

    /// Number of features these parameters cover
    pub fn input_dim(&self) -> usize {
        self.min_vals.len()
    }

    /// Check internal consistency (loaded parameters may be malformed)
    pub fn validate(&self) -> ScoreResult<()> {
        if self.min_vals.len() != self.max_vals.len() {
            return Err(ScoreError::InvalidBatchShape(format!(
                "scaling parameters have {} minimums but {} maximums",
                self.min_vals.len(),
                self.max_vals.len()
            )));
        }
        let finite = self.min_vals.iter().chain(&self.max_vals).all(|v| v.is_finite());
        if !finite {
            return Err(ScoreError::InvalidBatchShape(
                "scaling parameters contain non-finite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the transform: `(v - min) / (max - min)`, or `0` when `max == min`.
    ///
    /// Values outside the fitted range are not clamped.
    pub fn transform(&self, batch: &Batch) -> ScoreResult<NormalizedBatch> {
        self.validate()?;
        if self.input_dim() != batch.input_dim() {
            return Err(ScoreError::InvalidBatchShape(format!(
                "scaling parameters cover {} features, records have {}",
                self.input_dim(),
                batch.input_dim()
            )));
        }

        // f64 so `max - min` cannot overflow for finite f32 inputs
        let min = Array1::from_iter(self.min_vals.iter().map(|&lo| f64::from(lo)));
        let range = Array1::from_iter(
            self.max_vals
                .iter()
                .zip(&self.min_vals)
                .map(|(&max, &min)| f64::from(max) - f64::from(min)),
        );

        let mut values = batch.view().to_owned();
        for row in values.rows_mut() {
            Zip::from(row).and(&min).and(&range).for_each(|v, &lo, &span| {
                *v = if span == 0.0 {
                    0.0
                } else {
                    ((f64::from(*v) - lo) / span) as f32
                };
            });
        }

        Ok(NormalizedBatch { values })
    }
}

/// Batch after scaling, same shape and order as its source
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    values: Array2<f32>,
}

impl NormalizedBatch {
    /// Wrap values that are already on the model's scale
    pub fn from_array(values: Array2<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn input_dim(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }
}

/// Fits scaling on the batch being scored and applies it
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    expected_dim: Option<usize>,
}

impl Normalizer {
    /// `expected_dim` is the model's input width, when the model declares one
    pub fn new(expected_dim: Option<usize>) -> Self {
        Self { expected_dim }
    }

    pub fn fit_transform(&self, batch: &Batch) -> ScoreResult<(ScalingParameters, NormalizedBatch)> {
        if batch.is_empty() {
            return Err(ScoreError::EmptyBatch);
        }
        if let Some(dim) = self.expected_dim {
            batch.ensure_input_dim(dim)?;
        }

        let params = ScalingParameters::fit(batch);
        let normalized = params.transform(batch)?;

        log::debug!(
            "Fitted min-max scaling on {} records x {} features",
            batch.len(),
            batch.input_dim()
        );

        Ok((params, normalized))
    }
}

/// Where scaling parameters come from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScalingPolicy {
    /// Refit min/max on every scored batch
    #[default]
    FitPerBatch,
    /// Reuse parameters fitted at training time
    Fixed(ScalingParameters),
}

impl ScalingPolicy {
    /// Normalize `batch`, returning the parameters that were applied
    pub fn apply(
        &self,
        batch: &Batch,
        expected_dim: Option<usize>,
    ) -> ScoreResult<(ScalingParameters, NormalizedBatch)> {
        match self {
            ScalingPolicy::FitPerBatch => Normalizer::new(expected_dim).fit_transform(batch),
            ScalingPolicy::Fixed(params) => {
                if let Some(dim) = expected_dim {
                    batch.ensure_input_dim(dim)?;
                }
                let normalized = params.transform(batch)?;
                Ok((params.clone(), normalized))
            }
        }
    }
}
