//! ParkAPI server entry point.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use parkapi_server::{AppConfig, logging, run};

/// ParkAPI user registration and authentication server
#[derive(Parser, Debug)]
#[command(name = "parkapi-server")]
#[command(version)]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration (secrets redacted) and exit
    #[arg(long)]
    pub print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        let json = config.to_redacted_json()?;
        writeln!(std::io::stdout(), "{json}").context("failed to write configuration")?;
        return Ok(());
    }

    logging::init(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting ParkAPI server");

    run(&config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("HTTP server shutting down gracefully (ctrl-c)");
}
