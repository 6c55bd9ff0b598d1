//! Recording installer for tests.
//!
//! Records every action in call order and simulates toolchain installs by
//! updating the versions later probes report. Shipped in the library (not
//! behind `cfg(test)`) so integration tests and downstream test tooling can
//! drive the executor without touching the host.

use std::path::Path;

use crate::error::{Result, RoostError};

/// Installer double that records calls instead of acting.
pub struct RecordingInstaller {
    /// Recorded actions, in call order.
    pub calls: Vec<String>,

    /// Version the manager probe reports. Empty means "not installed".
    pub manager_version: String,

    /// Version the runtime probe reports. Empty means "not installed".
    pub runtime_version: String,

    /// When false, installs record but leave probed versions unchanged,
    /// simulating a failed remediation.
    pub installs_succeed: bool,

    /// Action name that should fail, for fail-fast tests.
    pub fail_on: Option<String>,
}

impl Default for RecordingInstaller {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            manager_version: "0.39.7".to_string(),
            runtime_version: "v20.11.1".to_string(),
            installs_succeed: true,
            fail_on: None,
        }
    }
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        if self.fail_on.as_deref() == Some(call.split('[').next().unwrap_or(&call)) {
            self.calls.push(call.clone());
            return Err(RoostError::CommandFailed {
                command: call,
                code: Some(1),
            });
        }
        self.calls.push(call);
        Ok(())
    }

    /// Names of recorded calls, with arguments stripped.
    pub fn call_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .map(|c| c.split('[').next().unwrap_or(c))
            .collect()
    }

    /// Whether any recorded call changes host state.
    pub fn destructive_calls(&self) -> Vec<&str> {
        self.call_names()
            .into_iter()
            .filter(|name| {
                !matches!(
                    *name,
                    "refresh_package_index"
                        | "version_manager_version"
                        | "runtime_version"
                        | "build_docs"
                        | "run_verification"
                )
            })
            .collect()
    }
}

impl super::Installer for RecordingInstaller {
    fn refresh_package_index(&mut self) -> Result<()> {
        self.record("refresh_package_index")
    }

    fn upgrade_system(&mut self) -> Result<()> {
        self.record("upgrade_system")
    }

    fn install_packages(&mut self, packages: &[&str]) -> Result<()> {
        self.record(format!("install_packages[{}]", packages.join(" ")))
    }

    fn version_manager_version(&mut self) -> Result<String> {
        self.record("version_manager_version")?;
        Ok(self.manager_version.clone())
    }

    fn install_version_manager(&mut self, version: &str) -> Result<()> {
        self.record(format!("install_version_manager[{}]", version))?;
        if self.installs_succeed {
            self.manager_version = version.to_string();
        }
        Ok(())
    }

    fn runtime_version(&mut self) -> Result<String> {
        self.record("runtime_version")?;
        Ok(self.runtime_version.clone())
    }

    fn install_runtime(&mut self, version: &str) -> Result<()> {
        self.record(format!("install_runtime[{}]", version))?;
        if self.installs_succeed {
            self.runtime_version = format!("v{}", version);
        }
        Ok(())
    }

    fn set_runtime_alias(&mut self, alias: &str, version: &str) -> Result<()> {
        self.record(format!("set_runtime_alias[{} {}]", alias, version))
    }

    fn create_virtualenv(&mut self, dir: &Path) -> Result<()> {
        self.record(format!("create_virtualenv[{}]", dir.display()))?;
        // The real action creates the directory; the probe relies on it.
        std::fs::create_dir_all(dir)?;
        Ok(())
    }

    fn install_python_packages(&mut self, packages: &[&str]) -> Result<()> {
        self.record(format!("install_python_packages[{}]", packages.join(" ")))
    }

    fn clone_and_install(&mut self, repo: &str) -> Result<()> {
        self.record(format!("clone_and_install[{}]", repo))
    }

    fn install_node_package(&mut self, package: &str) -> Result<()> {
        self.record(format!("install_node_package[{}]", package))
    }

    fn copy_template(&mut self, source: &Path, dest: &Path) -> Result<()> {
        self.record(format!(
            "copy_template[{} -> {}]",
            source.display(),
            dest.display()
        ))?;
        std::fs::create_dir_all(dest)?;
        Ok(())
    }

    fn apply_wifi_firmware_fix(&mut self) -> Result<()> {
        self.record("apply_wifi_firmware_fix")
    }

    fn predownload_platform(&mut self, platform: &str) -> Result<()> {
        self.record(format!("predownload_platform[{}]", platform))
    }

    fn fill_build_cache(&mut self) -> Result<()> {
        self.record("fill_build_cache")
    }

    fn build_docs(&mut self) -> Result<()> {
        self.record("build_docs")
    }

    fn grant_serial_access(&mut self) -> Result<()> {
        self.record("grant_serial_access")
    }

    fn run_verification(&mut self) -> Result<()> {
        self.record("run_verification")
    }
}
