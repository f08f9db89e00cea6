//! Fatal resolution errors

use std::path::PathBuf;
use thiserror::Error;

use super::ini::IniError;

/// Every condition that stops the launcher before the VCP starts.
///
/// The first three messages match what existing VCP launchers print.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("LinuxCNC must be running to launch a VCP")]
    HostNotRunning { lock_file: PathBuf },

    #[error("LinuxCNC is not running, no INI file specified on command line")]
    NoConfiguration,

    #[error("Specified INI file does not exist: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed reading INI file {}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed INI file {}", path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: IniError,
    },

    #[error("Invalid value {value:?} for [DISPLAY]{key}: {reason}")]
    InvalidIniValue { key: String, value: String, reason: String },

    #[error("Environment entry {key} was already published")]
    AlreadyPublished { key: &'static str },
}
