use std::{fs, path::Path, sync::Mutex};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to `path`; the terminal belongs to the UI.
/// `RUST_LOG` wins over `default_level` when set.
pub fn init(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={default_level},warn",
            env!("CARGO_PKG_NAME").replace('-', "_")
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("failed to install log subscriber")
}
