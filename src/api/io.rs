//! Batch decode / verdict encode at the process boundary

use std::io::Read;

use crate::error::ScoreResult;
use crate::logic::features::{Batch, FeatureVector};
use crate::logic::scoring::AnomalyVerdict;

/// Raw batch text: the positional argument, or stdin when absent or `-`
pub fn read_batch_source<R: Read>(arg: Option<&str>, mut stdin: R) -> ScoreResult<String> {
    match arg {
        Some(raw) if raw != "-" => Ok(raw.to_string()),
        _ => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse `[[f, ...], ...]` into a rectangular batch
pub fn decode_batch(raw: &str) -> ScoreResult<Batch> {
    let rows: Vec<FeatureVector> = serde_json::from_str(raw.trim())?;
    Batch::from_rows(rows)
}

/// One JSON line, verdicts in input order
pub fn encode_verdicts(verdicts: &[AnomalyVerdict], include_error: bool) -> ScoreResult<String> {
    if include_error {
        return Ok(serde_json::to_string(verdicts)?);
    }

    let bare: Vec<AnomalyVerdict> = verdicts
        .iter()
        .map(|v| AnomalyVerdict::new(v.node_index, v.anomalous))
        .collect();
    Ok(serde_json::to_string(&bare)?)
}
