//! Factory agent - heartbeat, remote commands, and log analysis for factory PCs

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use factory_agent::cli::Cli;
use factory_agent::output::json;
use factory_common::SettingsError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json_mode = cli.json;
    if let Err(e) = cli.run().await {
        if json_mode {
            let code = match e.downcast_ref::<SettingsError>() {
                Some(SettingsError::NotRegistered) => "NOT_REGISTERED",
                Some(_) => "INVALID_SETTINGS",
                None => "ERROR",
            };
            if let Ok(body) = json::format_error(&format!("{e:#}"), code) {
                println!("{body}");
            }
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
