use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SISYPHUS_LOG";
const LOG_FILE: &str = "sisyphus.log";

/// Installs a file logger next to the task file when `SISYPHUS_LOG` is set.
/// The terminal belongs to the TUI, so nothing is ever written to stdout/stderr.
pub fn init(tasks_path: &Path) -> Result<()> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let dir = tasks_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    let log_path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {:?}", log_path))?;

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
