use anyhow::Context;
use clap::Parser;
use review_core::ReviewCore;
use review_core::config::core_config::AppConfig;
use serde::Deserialize;
use tracing_subscriber::prelude::*;

mod cli;
mod commands;
mod render;

use cli::Cli;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliConfig {
    pub trace_level: Option<String>,
    pub trace_json: Option<bool>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config_files = cli.config.unwrap_or_default();
    config_files.insert(0, "config/config.yml".into());

    let app_config: AppConfig<CliConfig> =
        AppConfig::from_files(&config_files).context("Failed creating config")?;

    initialize_tracing(&app_config.app)?;

    let core = ReviewCore::with_reqwest(app_config.core).context("Failed creating HTTP client")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed creating runtime")?
        .block_on(commands::run(&core, cli.command))
}

fn initialize_tracing(config: &CliConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(config.trace_level.as_deref().unwrap_or("warn"))
        })
        .context("Failed to create env filter")?;

    let tracing_layer = tracing_subscriber::registry().with(filter);

    if config.trace_json.unwrap_or_default() {
        tracing_layer
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_layer
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    };

    Ok(())
}
