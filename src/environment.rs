//! Process environment and the fixed on-disk layout.
//!
//! Every component receives an immutable [`Environment`] at construction
//! instead of reading process-wide state ad hoc. The struct pins down where
//! the isolated runtime, caches, locks, and config fragments live, so tests
//! can point the whole orchestrator at a temporary directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, RoostError};

/// Marker variable that must be set by the activation shell.
pub const ACTIVATION_VAR: &str = "ROOST_ACTIVATED";

/// Expected value of [`ACTIVATION_VAR`].
pub const ACTIVATION_SENTINEL: &str = "1";

/// Immutable view of the host environment and roost's directory layout.
#[derive(Debug, Clone)]
pub struct Environment {
    home: PathBuf,
    data_dir: PathBuf,
    cache_dir: PathBuf,
    activated: bool,
}

impl Environment {
    /// Build the environment from the real process state.
    pub fn from_process() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let activated =
            std::env::var(ACTIVATION_VAR).as_deref() == Ok(ACTIVATION_SENTINEL);
        Self::with_home(home, activated)
    }

    /// Build an environment rooted at an explicit home directory.
    pub fn with_home(home: PathBuf, activated: bool) -> Self {
        let data_dir = home.join(".roost");
        let cache_dir = home.join(".cache").join("roost");
        Self {
            home,
            data_dir,
            cache_dir,
            activated,
        }
    }

    /// Fail unless the activation marker was present at startup.
    pub fn ensure_activated(&self) -> Result<()> {
        if self.activated {
            Ok(())
        } else {
            Err(RoostError::NotActivated {
                var: ACTIVATION_VAR,
                expected: ACTIVATION_SENTINEL,
            })
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Root of the persistent runtime (removed wholesale by clean mode).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// External download cache (removed by clean mode).
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The isolated Python runtime.
    pub fn venv_dir(&self) -> PathBuf {
        self.data_dir.join("venv")
    }

    /// nvm home, which doubles as the node workspace marker.
    pub fn node_dir(&self) -> PathBuf {
        self.data_dir.join("nvm")
    }

    /// Local binaries whose executable bits get repaired on every run.
    pub fn bin_dir(&self) -> PathBuf {
        self.data_dir.join("bin")
    }

    /// Lock files marking completed steps that leave no natural artifact.
    pub fn lock_file(&self, name: &str) -> PathBuf {
        self.data_dir.join("locks").join(format!("{}.lock", name))
    }

    /// Managed service configuration fragments.
    pub fn services_config(&self) -> PathBuf {
        self.data_dir.join("config").join("services.conf")
    }

    /// The nginx site config roost appends its reverse-proxy block to.
    pub fn nginx_config(&self) -> PathBuf {
        self.data_dir.join("config").join("nginx-roost.conf")
    }

    /// Source of the starter project template, shipped with the runtime.
    pub fn template_source(&self) -> PathBuf {
        self.data_dir.join("templates").join("starter")
    }

    /// Where the starter template is materialized for the user.
    pub fn template_dest(&self) -> PathBuf {
        self.home.join("roost-projects")
    }

    /// The write-only audit record of resolved options.
    pub fn options_file(&self) -> PathBuf {
        self.data_dir.join("options.json")
    }

    /// Whether a persistent runtime already exists.
    pub fn runtime_exists(&self) -> bool {
        self.venv_dir().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_at(home: &Path) -> Environment {
        Environment::with_home(home.to_path_buf(), true)
    }

    #[test]
    fn layout_is_rooted_under_home() {
        let env = env_at(Path::new("/home/pi"));
        assert_eq!(env.data_dir(), Path::new("/home/pi/.roost"));
        assert_eq!(env.cache_dir(), Path::new("/home/pi/.cache/roost"));
        assert_eq!(env.venv_dir(), Path::new("/home/pi/.roost/venv"));
        assert_eq!(env.node_dir(), Path::new("/home/pi/.roost/nvm"));
        assert_eq!(env.options_file(), Path::new("/home/pi/.roost/options.json"));
    }

    #[test]
    fn lock_files_carry_lock_suffix() {
        let env = env_at(Path::new("/home/pi"));
        assert_eq!(
            env.lock_file("cloudcmd"),
            Path::new("/home/pi/.roost/locks/cloudcmd.lock")
        );
    }

    #[test]
    fn template_dest_is_outside_data_dir() {
        let env = env_at(Path::new("/home/pi"));
        assert_eq!(env.template_dest(), Path::new("/home/pi/roost-projects"));
    }

    #[test]
    fn ensure_activated_rejects_inactive_shell() {
        let env = Environment::with_home(PathBuf::from("/home/pi"), false);
        assert!(matches!(
            env.ensure_activated(),
            Err(RoostError::NotActivated { .. })
        ));
    }

    #[test]
    fn ensure_activated_accepts_active_shell() {
        let env = env_at(Path::new("/home/pi"));
        assert!(env.ensure_activated().is_ok());
    }

    #[test]
    fn runtime_exists_reflects_venv_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_at(temp.path());
        assert!(!env.runtime_exists());
        std::fs::create_dir_all(env.venv_dir()).unwrap();
        assert!(env.runtime_exists());
    }
}
