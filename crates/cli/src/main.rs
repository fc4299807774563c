//! Subtuber CLI - client for the subtuber streamer monitoring backend

mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{App, Commands};
use std::path::PathBuf;
use subtuber_core::StateDir;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "subtuber")]
#[command(about = "Client for the subtuber streamer monitoring backend")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Configuration file (defaults to <config dir>/config.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// State directory holding config, session storage and logs
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Command failed: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let state_dir = StateDir::resolve(cli.state_dir);
    if !cli.no_file_log {
        state_dir.create_directories().await?;
    }
    logging::init_logging(cli.log_level.into(), &state_dir.log_dir(), cli.no_file_log)?;

    let settings = config::Settings::load(cli.config.as_deref(), &state_dir.config_path())?;
    debug!(?settings, "Loaded settings");

    let mut app = App::build(&settings, &state_dir)?;
    cli.command.execute(&mut app).await?;

    debug!("Command completed successfully");
    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
