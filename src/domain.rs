//! Core option types shared by the resolver, the CLI and the handoff document.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// VCPs offered by the chooser.
pub const BUILTIN_VCPS: &[&str] = &["mini", "brender", "probebasic"];

/// Every key of the command-line schema, in declaration order.
pub const OPTION_KEYS: &[&str] = &[
    "vcp",
    "ini",
    "log_level",
    "log_file",
    "pref_file",
    "theme",
    "stylesheet",
    "size",
    "position",
    "fullscreen",
    "maximize",
    "hide_menu_bar",
    "hide_status_bar",
    "perfmon",
    "chooser",
    "command_line_args",
];

static GEOMETRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+)\s*[xX]\s*(-?\d+)\s*$").expect("geometry pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("expected WIDTHxHEIGHT, got {0:?}")]
    Size(String),
    #[error("expected XPOSxYPOS, got {0:?}")]
    Position(String),
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARN", alias = "WARNING")]
    Warn,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Tracing has no level above ERROR, so CRITICAL collapses onto it.
    pub fn tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial window size in pixels (`WIDTHxHEIGHT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for WindowSize {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GeometryError::Size(s.to_string());
        let caps = GEOMETRY_PATTERN.captures(s).ok_or_else(err)?;
        let width = caps[1].parse::<u32>().map_err(|_| err())?;
        let height = caps[2].parse::<u32>().map_err(|_| err())?;
        Ok(WindowSize { width, height })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left corner of the window relative to the screen (`XPOSxYPOS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl FromStr for WindowPosition {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GeometryError::Position(s.to_string());
        let caps = GEOMETRY_PATTERN.captures(s).ok_or_else(err)?;
        let x = caps[1].parse::<i32>().map_err(|_| err())?;
        let y = caps[2].parse::<i32>().map_err(|_| err())?;
        Ok(WindowPosition { x, y })
    }
}

impl fmt::Display for WindowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// The finalized launch options.
///
/// Starts life as the command-line layer and is then overlaid with the
/// `[DISPLAY]` section of the INI file by [`crate::config::merge_display_section`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    pub vcp: Option<String>,
    pub ini: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub pref_file: Option<PathBuf>,
    pub theme: Option<String>,
    pub stylesheet: Option<PathBuf>,
    pub size: Option<WindowSize>,
    pub position: Option<WindowPosition>,
    pub fullscreen: bool,
    pub maximize: bool,
    pub hide_menu_bar: bool,
    pub hide_status_bar: bool,
    pub perfmon: bool,
    pub chooser: bool,
    pub command_line_args: Vec<String>,
}

impl ResolvedOptions {
    /// The chooser runs when forced with `--chooser` or when no VCP was named.
    pub fn wants_chooser(&self) -> bool {
        self.chooser || self.vcp.is_none()
    }
}
