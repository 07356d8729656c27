//! Batch - Core data structure for scoring input
//!
//! A batch is a rectangular matrix: one row per record, one column per
//! feature. Row index is the record identity (`nodeIndex`).

use ndarray::{Array2, ArrayView2};
#[cfg(test)]
use ndarray::ArrayView1;

use crate::error::{ScoreError, ScoreResult};

/// One activity record, as decoded from input
pub type FeatureVector = Vec<f32>;

/// Ordered, non-empty, rectangular set of records
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    records: Array2<f32>,
}

impl Batch {
    /// Build a batch from decoded rows.
    ///
    /// Rejects empty input, ragged rows, zero-width rows and non-finite values.
    pub fn from_rows(rows: Vec<FeatureVector>) -> ScoreResult<Self> {
        let first = rows.first().ok_or(ScoreError::EmptyBatch)?;
        let input_dim = first.len();

        if input_dim == 0 {
            return Err(ScoreError::InvalidBatchShape(
                "records must have at least one feature".to_string(),
            ));
        }

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != input_dim) {
            return Err(ScoreError::InvalidBatchShape(format!(
                "record {} has {} features, expected {}",
                index,
                row.len(),
                input_dim
            )));
        }

        for (index, row) in rows.iter().enumerate() {
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(ScoreError::InvalidInputFormat(format!(
                    "record {} feature {} is not a finite f32",
                    index, j
                )));
            }
        }

        let len = rows.len();
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let records = Array2::from_shape_vec((len, input_dim), flat)?;

        Ok(Self { records })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.nrows()
    }

    /// Always false; construction rejects empty batches
    pub fn is_empty(&self) -> bool {
        self.records.nrows() == 0
    }

    /// Features per record
    pub fn input_dim(&self) -> usize {
        self.records.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.records.view()
    }

    #[cfg(test)]
    pub fn record(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.records.row(index))
    }

    /// Reject a batch whose arity differs from what the model expects
    pub fn ensure_input_dim(&self, expected: usize) -> ScoreResult<()> {
        if self.input_dim() != expected {
            return Err(ScoreError::InvalidBatchShape(format!(
                "records have {} features, model expects {}",
                self.input_dim(),
                expected
            )));
        }
        Ok(())
    }
}
