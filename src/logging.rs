//! File logging
//!
//! The TUI owns the terminal, so log output goes to
//! `<cache dir>/codescent/codescent.log` instead of stderr.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;

pub const LOG_ENV: &str = "CODESCENT_LOG";

pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("codescent").join("codescent.log"))
}

/// Install the global logger. Returns the file being written to.
pub fn init() -> Result<PathBuf> {
    let path = log_path().context("No cache directory on this platform")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("Logger already initialised")?;

    log::info!("codescent {} ({}) starting", crate::build_info::VERSION, crate::build_info::GIT_SHA);
    Ok(path)
}
