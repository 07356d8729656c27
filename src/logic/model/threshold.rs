//! Threshold Configuration
//!
//! Quản lý ngưỡng phát hiện anomaly: a record is anomalous when its
//! reconstruction MSE is strictly greater than the threshold.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD;
use crate::error::{ScoreError, ScoreResult};

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum tolerated reconstruction MSE
    pub threshold: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    /// Validated threshold; must be finite and non-negative
    pub fn new(threshold: f32) -> ScoreResult<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ScoreError::InvalidConfig(format!(
                "threshold must be a finite non-negative number, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    /// Check if error exceeds threshold
    pub fn is_anomaly(&self, error: f32) -> bool {
        error > self.threshold
    }
}
