//! Shared CLI utilities.

use std::ffi::OsString;

/// LinuxCNC starts the display program with `-ini=FILE` (single dash), which
/// no long-option parser accepts. Rewrite the first such token to `--ini`.
/// Tokens after a `--` separator belong to the VCP and are left alone.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    let end = args.iter().position(|arg| arg == "--").unwrap_or(args.len());

    let legacy = args[..end]
        .iter_mut()
        .skip(1)
        .find(|arg| arg.to_str().is_some_and(|s| s.starts_with("-ini")));
    if let Some(arg) = legacy {
        let mut fixed = OsString::from("-");
        fixed.push(&*arg);
        *arg = fixed;
    }
    args
}
