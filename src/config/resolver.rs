//! Startup resolution: command line + INI file + environment
//!
//! Runs once, before logging or any GUI exists:
//! 1. overlay `[DISPLAY]` from the INI file onto the command-line options;
//! 2. require the LinuxCNC lock file;
//! 3. settle the INI path (host-provided `INI_FILE_NAME` first) and, when the
//!    launcher found it itself, publish `INI_FILE_NAME` and `CONFIG_DIR`.

use std::fs;
use std::path::{Path, PathBuf};

use super::env::EnvironmentContext;
use super::error::ResolveError;
use super::ini::IniFile;
use super::merge::merge_display_section;
use super::paths::normalize_path;
use super::settings::Settings;
use crate::domain::ResolvedOptions;

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    settings: Settings,
}

impl Resolver {
    pub fn new(settings: Settings) -> Self {
        Resolver { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve `cli` into the final options, publishing into `env` when the
    /// host has not done so already. On error nothing has been published.
    pub fn resolve(
        &self,
        cli: ResolvedOptions,
        env: &mut EnvironmentContext,
    ) -> Result<ResolvedOptions, ResolveError> {
        let base = self.settings.config_base_dir();

        let opts = match locate_ini(&cli, env, &base) {
            Some(path) => {
                let ini = load_ini(&path)?;
                tracing::debug!("merging [DISPLAY] from {}", path.display());
                merge_display_section(cli, &ini)?
            }
            None => cli,
        };

        self.check_host_running()?;

        if let Some(host_ini) = env.ini_file() {
            tracing::debug!("using INI file from environment: {}", host_ini.display());
            return Ok(opts);
        }

        let raw = opts.ini.as_deref().ok_or(ResolveError::NoConfiguration)?;
        let ini_file = canonical_ini_path(raw, &base)?;
        env.publish(&ini_file)?;

        Ok(opts)
    }

    fn check_host_running(&self) -> Result<(), ResolveError> {
        let lock_file = &self.settings.lock_file;
        if lock_file.is_file() {
            Ok(())
        } else {
            Err(ResolveError::HostNotRunning { lock_file: lock_file.clone() })
        }
    }
}

/// The INI file to merge from: `--ini` (anchored at `base`), else the host's
/// `INI_FILE_NAME`. An `--ini` that does not exist falls back to the host's
/// file; with no host file the merge is skipped and publishing reports it.
fn locate_ini(cli: &ResolvedOptions, env: &EnvironmentContext, base: &Path) -> Option<PathBuf> {
    let host_ini = env.ini_file().filter(|path| path.exists());

    if let Some(raw) = cli.ini.as_deref() {
        let explicit = normalize_path(raw, base);
        if explicit.exists() {
            return Some(explicit);
        }
        if let Some(host_ini) = host_ini {
            tracing::warn!(
                "INI file {} does not exist, merging [DISPLAY] from {} instead",
                explicit.display(),
                host_ini.display()
            );
        }
    }

    host_ini.map(Path::to_path_buf)
}

fn load_ini(path: &Path) -> Result<IniFile, ResolveError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ResolveError::ConfigUnreadable { path: path.to_path_buf(), source })?;
    IniFile::parse(&content)
        .map_err(|source| ResolveError::MalformedConfig { path: path.to_path_buf(), source })
}

fn canonical_ini_path(raw: &Path, base: &Path) -> Result<PathBuf, ResolveError> {
    let normalized = normalize_path(raw, base);
    fs::canonicalize(&normalized).map_err(|_| ResolveError::ConfigNotFound { path: normalized })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::{CONFIG_DIR_VAR, INI_FILE_VAR};
    use std::fs;
    use tempfile::TempDir;

    struct Machine {
        _tmp: TempDir,
        base: PathBuf,
        lock_file: PathBuf,
    }

    impl Machine {
        fn new() -> Self {
            let tmp = TempDir::new().expect("tmp");
            let base = tmp.path().join("configs");
            fs::create_dir_all(base.join("sim")).expect("mkdir configs");
            let lock_file = tmp.path().join("linuxcnc.lock");
            Machine { _tmp: tmp, base, lock_file }
        }

        fn running(self) -> Self {
            fs::write(&self.lock_file, "").expect("write lock");
            self
        }

        fn with_ini(self, relative: &str, body: &str) -> Self {
            fs::write(self.base.join(relative), body).expect("write ini");
            self
        }

        fn resolver(&self) -> Resolver {
            Resolver::new(Settings {
                lock_file: self.lock_file.clone(),
                config_base: self.base.display().to_string(),
            })
        }
    }

    fn cli_with_ini(ini: &str) -> ResolvedOptions {
        ResolvedOptions { ini: Some(PathBuf::from(ini)), ..Default::default() }
    }

    #[test]
    fn relative_ini_is_published_canonically() {
        let machine = Machine::new().running().with_ini("sim/mill.ini", "[DISPLAY]\n");
        let mut env = EnvironmentContext::default();

        machine.resolver().resolve(cli_with_ini("sim/../sim/mill.ini"), &mut env).expect("resolve");

        let expected = fs::canonicalize(machine.base.join("sim/mill.ini")).expect("canonical");
        assert_eq!(env.ini_file(), Some(expected.as_path()));
        assert_eq!(env.config_dir(), expected.parent());
        assert!(env.is_published());
    }

    #[test]
    fn display_section_scenarios() {
        let machine = Machine::new()
            .running()
            .with_ini("foo.ini", "[DISPLAY]\nFULLSCREEN = FALSE\nTHEME = dark\n");
        let mut env = EnvironmentContext::default();
        let cli = ResolvedOptions { fullscreen: true, ..cli_with_ini("foo.ini") };

        let opts = machine.resolver().resolve(cli, &mut env).expect("resolve");
        assert!(!opts.fullscreen);
        assert_eq!(opts.theme.as_deref(), Some("dark"));

        let mut env = EnvironmentContext::default();
        let cli = ResolvedOptions { theme: Some("light".to_string()), ..cli_with_ini("foo.ini") };
        let opts = machine.resolver().resolve(cli, &mut env).expect("resolve");
        assert_eq!(opts.theme.as_deref(), Some("light"));
    }

    #[test]
    fn missing_lock_file_fails_without_publishing() {
        let machine = Machine::new().with_ini("mill.ini", "[DISPLAY]\n");
        let mut env = EnvironmentContext::default();

        let err = machine.resolver().resolve(cli_with_ini("mill.ini"), &mut env).expect_err("fails");

        assert!(matches!(err, ResolveError::HostNotRunning { .. }));
        assert_eq!(err.to_string(), "LinuxCNC must be running to launch a VCP");
        assert!(!env.is_published());
        assert!(env.vars().is_empty());
    }

    #[test]
    fn host_environment_is_used_verbatim() {
        let machine = Machine::new().running();
        let mut env = EnvironmentContext::from_vars([(INI_FILE_VAR, "relative/not-there.ini")]);

        let opts = machine.resolver().resolve(cli_with_ini("other.ini"), &mut env).expect("resolve");

        assert_eq!(opts.ini, Some(PathBuf::from("other.ini")));
        assert_eq!(env.ini_file(), Some(Path::new("relative/not-there.ini")));
        assert!(env.vars().get(CONFIG_DIR_VAR).is_none());
        assert!(!env.is_published());
    }

    #[test]
    fn missing_ini_flag_falls_back_to_host_ini() {
        let machine = Machine::new()
            .running()
            .with_ini("host.ini", "[DISPLAY]\nTHEME = dark\nFULLSCREEN = TRUE\n");
        let host_ini = machine.base.join("host.ini");
        let mut env = EnvironmentContext::from_vars([(INI_FILE_VAR, host_ini.clone())]);

        let opts = machine.resolver().resolve(cli_with_ini("typo.ini"), &mut env).expect("resolve");

        assert_eq!(opts.theme.as_deref(), Some("dark"));
        assert!(opts.fullscreen);
        assert_eq!(opts.ini, Some(PathBuf::from("typo.ini")));
        assert_eq!(env.ini_file(), Some(host_ini.as_path()));
        assert!(!env.is_published());
    }

    #[test]
    fn host_ini_feeds_the_merge_when_no_flag_given() {
        let machine = Machine::new().running().with_ini("sim/mill.ini", "[DISPLAY]\nVCP = mini\n");
        let host_ini = machine.base.join("sim/mill.ini");
        let mut env = EnvironmentContext::from_vars([(INI_FILE_VAR, host_ini.display().to_string())]);

        let opts =
            machine.resolver().resolve(ResolvedOptions::default(), &mut env).expect("resolve");
        assert_eq!(opts.vcp.as_deref(), Some("mini"));
        assert!(opts.ini.is_none());
    }

    #[test]
    fn no_ini_anywhere_is_reported() {
        let machine = Machine::new().running();
        let mut env = EnvironmentContext::default();

        let err =
            machine.resolver().resolve(ResolvedOptions::default(), &mut env).expect_err("fails");
        assert!(matches!(err, ResolveError::NoConfiguration));
        assert_eq!(
            err.to_string(),
            "LinuxCNC is not running, no INI file specified on command line"
        );
    }

    #[test]
    fn missing_ini_file_is_reported_with_path() {
        let machine = Machine::new().running();
        let mut env = EnvironmentContext::default();

        let err = machine.resolver().resolve(cli_with_ini("nope.ini"), &mut env).expect_err("fails");
        match err {
            ResolveError::ConfigNotFound { path } => assert_eq!(path, machine.base.join("nope.ini")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!env.is_published());
    }

    #[test]
    fn malformed_ini_file_is_fatal() {
        let machine = Machine::new().running().with_ini("bad.ini", "[DISPLAY\nTHEME = dark\n");
        let mut env = EnvironmentContext::default();

        let err = machine.resolver().resolve(cli_with_ini("bad.ini"), &mut env).expect_err("fails");
        assert!(matches!(err, ResolveError::MalformedConfig { .. }));
        assert!(!env.is_published());

        let message = err.to_string();
        assert!(message.starts_with("Malformed INI file "), "{message}");
        assert!(!message.contains("unterminated section header"), "{message}");
        let cause = std::error::Error::source(&err).expect("source");
        assert_eq!(cause.to_string(), "line 1: unterminated section header \"[DISPLAY\"");
    }

    #[test]
    fn absolute_ini_ignores_config_base() {
        let machine = Machine::new().running();
        let elsewhere = TempDir::new().expect("tmp");
        let ini = elsewhere.path().join("lathe.ini");
        fs::write(&ini, "[DISPLAY]\nSIZE = 800x600\n").expect("write ini");
        let mut env = EnvironmentContext::default();

        let opts = machine
            .resolver()
            .resolve(cli_with_ini(ini.to_str().expect("utf8 path")), &mut env)
            .expect("resolve");

        assert_eq!(opts.size.map(|s| s.to_string()).as_deref(), Some("800x600"));
        let expected = fs::canonicalize(&ini).expect("canonical");
        assert_eq!(env.ini_file(), Some(expected.as_path()));
    }
}
