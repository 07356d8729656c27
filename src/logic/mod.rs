//! Logic Module - Scoring engine
//!
//! - `features/` - Batch shape & min-max normalization
//! - `model/` - Autoencoder backends (ONNX, dense), threshold, checksum guard
//! - `scoring/` - Reconstruction error & verdicts

pub mod features;
pub mod model;
pub mod scoring;
