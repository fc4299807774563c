use anyhow::Result;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "cli.log";

/// Initialize logging for the CLI.
///
/// `RUST_LOG` wins over `log_level`. Logs go to stderr and, unless
/// `no_file_log` is set, to `cli.log` under `log_dir`.
pub fn init_logging(log_level: Level, log_dir: &Path, no_file_log: bool) -> Result<()> {
    if no_file_log {
        init_stderr_logging(log_level)
    } else {
        init_file_logging(log_level, log_dir)
    }
}

fn env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "subtuber={level_str},subtuber_core={level_str},subtuber_http={level_str},subtuber_frontend_common={level_str}"
        )
        .into()
    })
}

fn init_file_logging(level: Level, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE))?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn init_stderr_logging(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
