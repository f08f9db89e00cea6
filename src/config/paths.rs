//! Path expansion for INI and log file arguments

use std::path::{Path, PathBuf};

/// Expand `~` and `$VAR`/`${VAR}` references in `raw`.
///
/// Variables that are not set stay in the path literally, so a file name
/// that happens to contain `$` still resolves.
pub fn expand_path(raw: &str) -> PathBuf {
    let home_expanded = shellexpand::tilde(raw);
    let expanded = shellexpand::full_with_context_no_errors(
        &*home_expanded,
        || None::<String>,
        |var| std::env::var(var).ok(),
    );
    PathBuf::from(expanded.into_owned())
}

/// Expand `path` and anchor it at `base` when it is still relative.
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = expand_path(&path.to_string_lossy());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_anchored_at_base() {
        let base = Path::new("/opt/configs");
        let path = normalize_path(Path::new("sim/mill.ini"), base);
        assert_eq!(path, PathBuf::from("/opt/configs/sim/mill.ini"));
    }

    #[test]
    fn absolute_paths_ignore_base() {
        let path = normalize_path(Path::new("/etc/mill.ini"), Path::new("/opt/configs"));
        assert_eq!(path, PathBuf::from("/etc/mill.ini"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = shellexpand::tilde("~").into_owned();
        let path = expand_path("~/linuxcnc/configs");
        assert_eq!(path, Path::new(&home).join("linuxcnc/configs"));
    }

    #[test]
    fn set_variables_are_expanded() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        assert_eq!(expand_path("${HOME}/mill.ini"), Path::new(&home).join("mill.ini"));
    }

    #[test]
    fn undefined_variables_stay_literal() {
        assert_eq!(
            expand_path("$VCP_LAUNCH_TEST_UNDEFINED_VARIABLE/mill.ini"),
            PathBuf::from("$VCP_LAUNCH_TEST_UNDEFINED_VARIABLE/mill.ini")
        );
        assert_eq!(
            normalize_path(Path::new("a$b.ini"), Path::new("/opt/configs")),
            PathBuf::from("/opt/configs/a$b.ini")
        );
    }
}
