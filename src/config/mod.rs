//! Configuration loading and merging
//!
//! Resolves launch options from the command line and the machine INI file
//! with the host's precedence rules, then publishes the environment entries
//! every VCP reads (`INI_FILE_NAME`, `CONFIG_DIR`).

pub mod env;
pub mod error;
pub mod ini;
pub mod merge;
pub mod paths;
pub mod resolver;
pub mod settings;

pub use env::{EnvironmentContext, CONFIG_DIR_VAR, INI_FILE_VAR};
pub use error::ResolveError;
pub use ini::{IniError, IniFile};
pub use merge::{merge_display_section, DISPLAY_SECTION};
pub use resolver::Resolver;
pub use settings::Settings;
