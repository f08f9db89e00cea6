//! Tracing setup from the resolved log level and log file

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::paths::expand_path;
use crate::domain::LogLevel;

/// Install the global subscriber.
///
/// Events go to stderr, and additionally to `log_file` (appending, without
/// ANSI colours) when one is given. `RUST_LOG` directives are honoured on top
/// of `level`. Calling this again after a subscriber is installed is a no-op.
pub fn init(level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            let file = open_log_file(&path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.tracing_level().into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .try_init();

    tracing::debug!(level = %level, log_file = ?log_file, "logging initialised");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
