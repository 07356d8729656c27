//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! CLI flags override environment variables (bound in `api::cli`),
//! which override these defaults.

/// Default anomaly threshold (reconstruction MSE)
pub const DEFAULT_THRESHOLD: f32 = 0.01;

/// Default model artifact, resolved against the working directory
pub const DEFAULT_MODEL_PATH: &str = "autoencoder_model.onnx";

/// Default log filter (stderr only, stdout carries the result)
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable names
pub const ENV_THRESHOLD: &str = "ANOMALY_THRESHOLD";
pub const ENV_MODEL_PATH: &str = "ANOMALY_MODEL_PATH";
pub const ENV_SCALING: &str = "ANOMALY_SCALING";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
