//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Factory PC agent: heartbeat, remote commands, and log analysis
#[derive(Parser)]
#[command(
    name = "factory-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log filter, e.g. `debug` or `factory_agent=trace` (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Heartbeat and execute server commands until stopped
    Run(commands::run::RunArgs),

    /// Register this PC with the management server
    Register(commands::register::RegisterArgs),

    /// Analyse the operation timeline of a log file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Print a log file
    ReadLog(commands::read_log::ReadLogArgs),

    /// Show agent settings
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Default log filter when neither `--log-level` nor `RUST_LOG` is set.
    #[must_use]
    pub fn default_log_filter(&self) -> &'static str {
        match self.command {
            Command::Run(_) => "info",
            _ => "warn",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        if let Command::Version = command {
            commands::version::run(json);
            return Ok(());
        }

        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::Register(args) => commands::register::run(&app, args),
            Command::Analyze(args) => commands::analyze::run(&app, &args),
            Command::ReadLog(args) => commands::read_log::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => Ok(()),
        }
    }
}
