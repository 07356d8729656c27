//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::constants;

/// Score a batch of activity records against a trained autoencoder
///
/// Prints one JSON line: `[{"nodeIndex":0,"anomalous":false},...]`.
#[derive(Parser, Debug)]
#[command(name = "anomaly-scorer", version)]
pub struct Cli {
    /// Batch as a JSON array of numeric arrays; omit or pass `-` to read stdin
    #[arg(allow_hyphen_values = true)]
    pub batch: Option<String>,

    /// Model artifact (.onnx or dense .json)
    #[arg(long, short = 'm', env = constants::ENV_MODEL_PATH, default_value = constants::DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Model metadata JSON (default: `<model>.json` when present)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Reconstruction MSE above which a record is anomalous
    #[arg(long, short = 't', env = constants::ENV_THRESHOLD, allow_hyphen_values = true)]
    pub threshold: Option<f32>,

    /// Scaling source: `batch` or `training`
    #[arg(long, env = constants::ENV_SCALING, value_name = "MODE")]
    pub scaling: Option<String>,

    /// Expected SHA-256 of the model file
    #[arg(long, value_name = "HEX")]
    pub model_sha256: Option<String>,

    /// Include `reconstructionError` in each verdict
    #[arg(long)]
    pub include_error: bool,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,
}
