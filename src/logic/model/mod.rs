//! Model Module - AI/ML Inference Engine
//!
//! Tách logic inference khỏi scoring.
//! Dễ dàng swap model backend (ONNX, dense JSON).

pub mod inference;
pub mod threshold;
pub mod dense;
pub mod onnx;
pub mod guard;

// Re-export common types
pub use inference::{load_model, Autoencoder, LoadOptions, ModelMetadata};
pub use threshold::ThresholdConfig;
