//! Model Guard - artifact integrity check
//!
//! Xác minh checksum của model trước khi load.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{ScoreError, ScoreResult};

/// SHA-256 of a file, lowercase hex
pub fn file_sha256(path: &Path) -> ScoreResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        ScoreError::ModelLoadError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Fail with `ModelLoadError` unless the file hashes to `expected`
pub fn verify_checksum(path: &Path, expected: &str) -> ScoreResult<()> {
    let actual = file_sha256(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ScoreError::ModelLoadError(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected.trim(),
            actual
        )));
    }
    log::debug!("Model checksum verified: {}", actual);
    Ok(())
}
