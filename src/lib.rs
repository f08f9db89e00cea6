//! Option resolution and environment bootstrap for LinuxCNC VCPs.

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
