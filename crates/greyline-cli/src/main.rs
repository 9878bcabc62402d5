//! Greyline command line
//!
//! Runs single decisions, validates rule files and reports engine status.

mod cli;
mod commands;
mod config;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing()?;

    match cli.command {
        Command::Validate { file } => commands::validate(&file),
        Command::Decide {
            ref input,
            ref request_id,
            pretty,
        } => {
            let config = load_engine_config(&cli)?;
            commands::decide(config, input.as_deref(), request_id.clone(), pretty).await
        }
        Command::Status => {
            let config = load_engine_config(&cli)?;
            commands::status(config)
        }
    }
}

fn load_engine_config(cli: &Cli) -> Result<greyline_sdk::EngineConfig> {
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config.into_engine_config(cli.rules.clone()))
}

/// Initialize tracing subscriber. Logs go to stderr so stdout stays JSON.
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "greyline_cli=info,greyline_sdk=info,greyline_runtime=info,greyline_llm=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
