//! Score command - one batch per invocation

use std::io::Read;

use super::cli::Cli;
use super::io;
use crate::config::Config;
use crate::error::ScoreResult;
use crate::logic::model::load_model;
use crate::logic::scoring::ReconstructionScorer;

/// Run the full pipeline and return the JSON line to print.
///
/// Nothing is returned on failure, so callers never emit partial output.
pub fn score<R: Read>(cli: &Cli, stdin: R) -> ScoreResult<String> {
    let config = Config::from_cli(cli)?;

    let loaded = load_model(&config.model_path, &config.load_options())?;
    let threshold = config.threshold_for(&loaded.metadata)?;
    let scaling = config.scaling_policy(&loaded.metadata)?;
    let input_dim = loaded.input_dim();
    log::debug!(
        "Scoring with {} ({} backend, input width {:?})",
        loaded.path.display(),
        loaded.model.backend(),
        input_dim
    );

    let raw = io::read_batch_source(cli.batch.as_deref(), stdin)?;
    let batch = io::decode_batch(&raw)?;
    if let Some(dim) = input_dim {
        batch.ensure_input_dim(dim)?;
    }
    log::debug!("Decoded batch: {} records x {} features", batch.len(), batch.input_dim());

    let scorer = ReconstructionScorer::new(loaded.model, scaling, threshold);
    let verdicts = scorer.score_batch(&batch)?;

    io::encode_verdicts(&verdicts, config.include_error)
}
