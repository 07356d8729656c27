//! Activity Anomaly Scorer - Main Entry Point
//!
//! One batch in (argv or stdin), one JSON line of verdicts out.
//! Diagnostics go to stderr; stdout stays empty on failure.

mod api;
mod config;
mod error;
mod logic;
pub mod constants;

use std::process::ExitCode;

use clap::Parser;

use api::cli::Cli;

fn init_logging(cli: &Cli) {
    let mut builder = match &cli.log_level {
        Some(level) => {
            let mut b = env_logger::Builder::new();
            b.parse_filters(level);
            b
        }
        None => env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(constants::DEFAULT_LOG_LEVEL),
        ),
    };
    builder.target(env_logger::Target::Stderr).init();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli);

    log::debug!("anomaly-scorer v{}", constants::APP_VERSION);

    match api::commands::score(&cli, std::io::stdin().lock()) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("anomaly-scorer: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
