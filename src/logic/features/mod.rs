//! Features Module - Batch decoding & normalization
//!
//! Input records become a rectangular `Batch`, then a `NormalizedBatch`
//! on the scale the autoencoder was trained on.

pub mod batch;
pub mod normalize;


// Re-export common types
pub use batch::{Batch, FeatureVector};
pub use normalize::{NormalizedBatch, Normalizer, ScalingParameters, ScalingPolicy};
