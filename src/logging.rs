use crate::config::Config;
use crate::util::non_empty_env;
use anyhow::{anyhow, Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "DCHAT_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// The TUI owns the terminal, so records only ever go to the configured log
/// file. A log file that cannot be opened is an error; call this before the
/// terminal session starts.
pub fn init(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(resolve_log_filter())
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let file = open_log_file(&config.log_path).with_context(|| {
        format!("cannot open log file {}", config.log_path.display())
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

fn resolve_log_filter() -> String {
    non_empty_env(LOG_FILTER_ENV)
        .or_else(|| non_empty_env("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
