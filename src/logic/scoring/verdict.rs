//! Anomaly verdict - one output entry per input record

use serde::{Deserialize, Serialize};

/// Verdict for the record at `node_index` in the input batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyVerdict {
    pub node_index: usize,
    pub anomalous: bool,
    /// Only emitted when explicitly requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconstruction_error: Option<f32>,
}

impl AnomalyVerdict {
    pub fn new(node_index: usize, anomalous: bool) -> Self {
        Self {
            node_index,
            anomalous,
            reconstruction_error: None,
        }
    }

    pub fn with_error(mut self, error: f32) -> Self {
        self.reconstruction_error = Some(error);
        self
    }
}
