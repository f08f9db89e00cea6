//! Command-line interface for vcp-launch
//!
//! Parses the VCP option grammar, resolves it against the machine INI file,
//! then hands the final options to the VCP as a JSON document on stdout.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde_json::json;
use std::path::PathBuf;

use crate::config::{EnvironmentContext, Resolver, Settings};
use crate::domain::{LogLevel, ResolvedOptions, WindowPosition, WindowSize};
use crate::logging;

pub mod chooser;
mod utils;

use chooser::{apply_chooser, TerminalChooser};
pub use utils::normalize_legacy_args;

/// Launch a LinuxCNC Virtual Control Panel
#[derive(Parser, Debug)]
#[command(name = "vcp-launch")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = "When started from the INI with [DISPLAY]DISPLAY = vcp-launch, \
LinuxCNC passes --ini itself so it does not need to be given.")]
pub struct Cli {
    /// Name of the VCP to launch. The chooser is shown when omitted
    #[arg(value_name = "VCP")]
    pub vcp: Option<String>,

    /// Path to the INI file, relative to ~/linuxcnc/configs
    #[arg(long, value_name = "INI")]
    pub ini: Option<PathBuf>,

    /// The Qt theme to use, defaults to the system theme
    #[arg(long, value_name = "THEME", help_heading = "Display Options")]
    pub theme: Option<String>,

    /// QSS file with styles applied to Qt and VCP widget classes
    #[arg(long, value_name = "STYLESHEET", help_heading = "Display Options")]
    pub stylesheet: Option<PathBuf>,

    /// Initial size of the window in pixels
    #[arg(long, value_name = "WIDTHxHEIGHT", help_heading = "Display Options")]
    pub size: Option<WindowSize>,

    /// Initial position of the window's top left corner on the screen
    #[arg(long, value_name = "XPOSxYPOS", help_heading = "Display Options")]
    pub position: Option<WindowPosition>,

    /// Start with the window fullscreen
    #[arg(short, long, help_heading = "Display Options")]
    pub fullscreen: bool,

    /// Start with the window maximized
    #[arg(short, long, help_heading = "Display Options")]
    pub maximize: bool,

    /// Hide the menu bar, if present
    #[arg(long, help_heading = "Display Options")]
    pub hide_menu_bar: bool,

    /// Hide the status bar, if present
    #[arg(long, help_heading = "Display Options")]
    pub hide_status_bar: bool,

    /// Log level
    #[arg(
        long,
        value_enum,
        ignore_case = true,
        default_value = "INFO",
        value_name = "LEVEL",
        help_heading = "Application Options"
    )]
    pub log_level: LogLevel,

    /// Log file. Overrides the INI setting
    #[arg(long, value_name = "FILE", help_heading = "Application Options")]
    pub log_file: Option<PathBuf>,

    /// Preference file. Overrides the INI setting
    #[arg(long, value_name = "FILE", help_heading = "Application Options")]
    pub pref_file: Option<PathBuf>,

    /// Monitor and log system performance
    #[arg(long, help_heading = "Application Options")]
    pub perfmon: bool,

    /// Always show the VCP chooser, ignoring any VCP named on the command line or in the INI
    #[arg(long)]
    pub chooser: bool,

    /// Show version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Arguments passed through to the VCP
    #[arg(last = true, value_name = "ARGS")]
    pub command_line_args: Vec<String>,
}

impl From<Cli> for ResolvedOptions {
    fn from(cli: Cli) -> Self {
        ResolvedOptions {
            vcp: cli.vcp,
            ini: cli.ini,
            log_level: cli.log_level,
            log_file: cli.log_file,
            pref_file: cli.pref_file,
            theme: cli.theme,
            stylesheet: cli.stylesheet,
            size: cli.size,
            position: cli.position,
            fullscreen: cli.fullscreen,
            maximize: cli.maximize,
            hide_menu_bar: cli.hide_menu_bar,
            hide_status_bar: cli.hide_status_bar,
            perfmon: cli.perfmon,
            chooser: cli.chooser,
            command_line_args: cli.command_line_args,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse_from(normalize_legacy_args(std::env::args_os()));

    let settings = Settings::load().context("Invalid VCP_LAUNCH_* settings")?;
    let mut env = EnvironmentContext::from_process();
    let mut opts = Resolver::new(settings).resolve(cli.into(), &mut env)?;

    // Logging and the VCP both read INI_FILE_NAME/CONFIG_DIR.
    env.export_to_process();

    if !apply_chooser(&TerminalChooser::default(), &mut opts)? {
        return Ok(());
    }

    logging::init(opts.log_level, opts.log_file.as_deref())?;
    tracing::info!(
        "launching VCP {} with {}",
        opts.vcp.as_deref().unwrap_or("<none>"),
        env.ini_file().map(|p| p.display().to_string()).unwrap_or_default()
    );

    let document = handoff_document(&opts, &env);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// What the VCP process receives: the final options and its environment.
pub fn handoff_document(opts: &ResolvedOptions, env: &EnvironmentContext) -> serde_json::Value {
    json!({
        "options": opts,
        "environment": env.display_vars(),
    })
}
