//! Process environment shared with the VCP
//!
//! LinuxCNC exports `INI_FILE_NAME` and `CONFIG_DIR` to the programs it
//! starts. When a VCP is launched by hand the launcher publishes the same two
//! entries. The context is an explicit value so that resolution can be run
//! against an isolated map; only [`EnvironmentContext::export_to_process`]
//! touches the real environment.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use super::error::ResolveError;

pub const INI_FILE_VAR: &str = "INI_FILE_NAME";
pub const CONFIG_DIR_VAR: &str = "CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentContext {
    vars: BTreeMap<String, OsString>,
    published: bool,
}

impl EnvironmentContext {
    /// Snapshot the variables the launcher reads from the process environment.
    pub fn from_process() -> Self {
        Self::from_vars(
            [INI_FILE_VAR, CONFIG_DIR_VAR]
                .into_iter()
                .filter_map(|key| std::env::var_os(key).map(|value| (key, value))),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        EnvironmentContext {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            published: false,
        }
    }

    /// Value of `key`, treating an empty string as unset.
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str).filter(|value| !value.is_empty())
    }

    pub fn ini_file(&self) -> Option<&Path> {
        self.get(INI_FILE_VAR).map(Path::new)
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.get(CONFIG_DIR_VAR).map(Path::new)
    }

    pub fn vars(&self) -> &BTreeMap<String, OsString> {
        &self.vars
    }

    /// The variables as text, for logging and the handoff document. Bytes
    /// that are not UTF-8 are replaced.
    pub fn display_vars(&self) -> BTreeMap<&str, String> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Record `ini_file` and its directory. Allowed once, and only when the
    /// host did not already provide `INI_FILE_NAME`.
    pub fn publish(&mut self, ini_file: &Path) -> Result<(), ResolveError> {
        if self.published || self.get(INI_FILE_VAR).is_some() {
            return Err(ResolveError::AlreadyPublished { key: INI_FILE_VAR });
        }

        let config_dir = ini_file.parent().unwrap_or_else(|| Path::new("/"));
        self.vars.insert(INI_FILE_VAR.to_string(), ini_file.as_os_str().to_owned());
        self.vars.insert(CONFIG_DIR_VAR.to_string(), config_dir.as_os_str().to_owned());
        self.published = true;

        tracing::debug!(
            ini_file = %ini_file.display(),
            config_dir = %config_dir.display(),
            "published environment"
        );
        Ok(())
    }

    /// Write the published entries into the process environment.
    ///
    /// Must run before logging or the VCP itself start, both of which read
    /// these variables. Does nothing when the host already set them.
    pub fn export_to_process(&self) {
        if !self.published {
            return;
        }
        for key in [INI_FILE_VAR, CONFIG_DIR_VAR] {
            if let Some(value) = self.vars.get(key) {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let env = EnvironmentContext::from_vars([(INI_FILE_VAR, "")]);
        assert!(env.ini_file().is_none());
    }

    #[test]
    fn publish_records_file_and_directory() {
        let mut env = EnvironmentContext::default();
        env.publish(Path::new("/home/cnc/linuxcnc/configs/sim/mill.ini")).expect("publish");

        assert!(env.is_published());
        assert_eq!(env.ini_file(), Some(Path::new("/home/cnc/linuxcnc/configs/sim/mill.ini")));
        assert_eq!(env.config_dir(), Some(Path::new("/home/cnc/linuxcnc/configs/sim")));
    }

    #[test]
    fn publish_is_write_once() {
        let mut env = EnvironmentContext::default();
        env.publish(Path::new("/a/one.ini")).expect("first publish");

        let err = env.publish(Path::new("/b/two.ini")).expect_err("second publish");
        assert!(matches!(err, ResolveError::AlreadyPublished { key: INI_FILE_VAR }));
        assert_eq!(env.ini_file(), Some(Path::new("/a/one.ini")));
    }

    #[test]
    fn publish_refuses_to_override_host_value() {
        let mut env = EnvironmentContext::from_vars([(INI_FILE_VAR, "/host/mill.ini")]);
        assert!(env.publish(Path::new("/other/mill.ini")).is_err());
        assert_eq!(env.ini_file(), Some(Path::new("/host/mill.ini")));
        assert!(env.config_dir().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_host_ini_is_kept() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/srv/m\xffll/mill.ini".to_vec());
        let mut env = EnvironmentContext::from_vars([(INI_FILE_VAR, raw.clone())]);

        assert_eq!(env.ini_file(), Some(Path::new(&raw)));
        assert!(env.publish(Path::new("/other/mill.ini")).is_err());
        assert_eq!(env.display_vars()[INI_FILE_VAR], "/srv/m\u{fffd}ll/mill.ini");
    }
}
