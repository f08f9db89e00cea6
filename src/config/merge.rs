//! Overlay of the INI `[DISPLAY]` section onto the command-line options
//!
//! Every option key is looked up uppercased in `[DISPLAY]`:
//! - valued options take the INI value only when the command line left
//!   them unset;
//! - flags always take the INI value, even over an explicit command-line
//!   flag. This matches how existing machine configs behave, so a
//!   `FULLSCREEN = FALSE` line cannot be overridden with `--fullscreen`.

use std::fmt::Display;
use std::str::FromStr;

use super::error::ResolveError;
use super::ini::{IniFile, IniSection};
use crate::domain::ResolvedOptions;

pub const DISPLAY_SECTION: &str = "DISPLAY";

const TRUTHY: &[&str] = &["true", "1", "on"];

/// INI booleans are true only for `true`, `1` or `on` (any case).
pub fn parse_ini_bool(value: &str) -> bool {
    TRUTHY.contains(&value.trim().to_ascii_lowercase().as_str())
}

pub fn merge_display_section(
    mut opts: ResolvedOptions,
    ini: &IniFile,
) -> Result<ResolvedOptions, ResolveError> {
    let Some(display) = ini.section(DISPLAY_SECTION) else {
        return Ok(opts);
    };

    overlay_value(&mut opts.vcp, display, "vcp")?;
    overlay_value(&mut opts.ini, display, "ini")?;
    // log_level always carries the INFO default from the command line, so
    // [DISPLAY]LOG_LEVEL is never consulted.
    overlay_value(&mut opts.log_file, display, "log_file")?;
    overlay_value(&mut opts.pref_file, display, "pref_file")?;
    overlay_value(&mut opts.theme, display, "theme")?;
    overlay_value(&mut opts.stylesheet, display, "stylesheet")?;
    overlay_value(&mut opts.size, display, "size")?;
    overlay_value(&mut opts.position, display, "position")?;

    overlay_flag(&mut opts.fullscreen, display, "fullscreen");
    overlay_flag(&mut opts.maximize, display, "maximize");
    overlay_flag(&mut opts.hide_menu_bar, display, "hide_menu_bar");
    overlay_flag(&mut opts.hide_status_bar, display, "hide_status_bar");
    overlay_flag(&mut opts.perfmon, display, "perfmon");
    overlay_flag(&mut opts.chooser, display, "chooser");

    if opts.command_line_args.is_empty() {
        if let Some(raw) = lookup(display, "command_line_args") {
            opts.command_line_args = raw.split_whitespace().map(str::to_string).collect();
        }
    }

    Ok(opts)
}

fn lookup<'a>(display: &'a IniSection, key: &str) -> Option<&'a str> {
    display.get(&key.to_ascii_uppercase())
}

fn overlay_value<T>(
    slot: &mut Option<T>,
    display: &IniSection,
    key: &str,
) -> Result<(), ResolveError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(display, key) else {
        return Ok(());
    };
    if slot.is_some() {
        tracing::debug!(
            "--{} given on command line, ignoring [DISPLAY]{}",
            key.replace('_', "-"),
            key.to_ascii_uppercase()
        );
        return Ok(());
    }

    let value = raw.parse::<T>().map_err(|e| ResolveError::InvalidIniValue {
        key: key.to_ascii_uppercase(),
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    *slot = Some(value);
    Ok(())
}

// A flag has no unset state, so the INI value always wins.
fn overlay_flag(slot: &mut bool, display: &IniSection, key: &str) {
    if let Some(raw) = lookup(display, key) {
        *slot = parse_ini_bool(raw);
    }
}
