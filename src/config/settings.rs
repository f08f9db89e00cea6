//! Launcher settings
//!
//! Where the launcher looks for the LinuxCNC lock file and which directory
//! relative `--ini` paths are anchored at. Both default to the locations a
//! stock LinuxCNC install uses and can be overridden with `VCP_LAUNCH_*`
//! environment variables (CLI > Env > Defaults).

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths::expand_path;

pub const ENV_PREFIX: &str = "VCP_LAUNCH_";
pub const DEFAULT_LOCK_FILE: &str = "/tmp/linuxcnc.lock";
pub const DEFAULT_CONFIG_BASE: &str = "~/linuxcnc/configs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Marker file that exists while LinuxCNC is running.
    pub lock_file: PathBuf,
    /// Base for relative INI paths. May contain `~` and `$VAR`.
    pub config_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            lock_file: PathBuf::from(DEFAULT_LOCK_FILE),
            config_base: DEFAULT_CONFIG_BASE.to_string(),
        }
    }
}

impl Settings {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn config_base_dir(&self) -> PathBuf {
        expand_path(&self.config_base)
    }
}
