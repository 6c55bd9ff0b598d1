//! External installer collaborators.
//!
//! The step executor drives installation through the [`Installer`] trait:
//! every network download, package install, and subprocess lives behind it.
//! [`SystemInstaller`] is the real implementation; [`RecordingInstaller`]
//! records calls for tests.

pub mod recording;
pub mod system;

pub use recording::RecordingInstaller;
pub use system::SystemInstaller;

use std::path::Path;

use crate::error::Result;

/// Opaque external installation actions.
///
/// Each method blocks until the underlying action completes; failures are
/// surfaced as errors and abort the run (fail-fast, no rollback).
pub trait Installer {
    /// Refresh the package manager's index.
    fn refresh_package_index(&mut self) -> Result<()>;

    /// Upgrade all installed system packages.
    fn upgrade_system(&mut self) -> Result<()>;

    /// Install the named system packages.
    fn install_packages(&mut self, packages: &[&str]) -> Result<()>;

    /// Report the version manager's version; empty when not installed.
    fn version_manager_version(&mut self) -> Result<String>;

    /// Install the pinned version manager release.
    fn install_version_manager(&mut self, version: &str) -> Result<()>;

    /// Report the runtime's version; empty when not installed.
    fn runtime_version(&mut self) -> Result<String>;

    /// Install a runtime version through the version manager.
    fn install_runtime(&mut self, version: &str) -> Result<()>;

    /// Bind the installed runtime version to a stable alias.
    fn set_runtime_alias(&mut self, alias: &str, version: &str) -> Result<()>;

    /// Create the isolated Python runtime at the given directory.
    fn create_virtualenv(&mut self, dir: &Path) -> Result<()>;

    /// Install packages into the isolated runtime.
    fn install_python_packages(&mut self, packages: &[&str]) -> Result<()>;

    /// Clone a helper project and install it editable into the runtime.
    fn clone_and_install(&mut self, repo: &str) -> Result<()>;

    /// Install a global npm package under the runtime alias.
    fn install_node_package(&mut self, package: &str) -> Result<()>;

    /// Copy the starter template to its destination.
    fn copy_template(&mut self, source: &Path, dest: &Path) -> Result<()>;

    /// Replace the broken wifi access-point firmware blob.
    fn apply_wifi_firmware_fix(&mut self) -> Result<()>;

    /// Pre-download a named build platform.
    fn predownload_platform(&mut self, platform: &str) -> Result<()>;

    /// Warm the build cache by compiling the starter template once.
    fn fill_build_cache(&mut self) -> Result<()>;

    /// Rebuild the local documentation.
    fn build_docs(&mut self) -> Result<()>;

    /// Grant the invoking user access to serial devices.
    fn grant_serial_access(&mut self) -> Result<()>;

    /// Run the post-install verification suite.
    fn run_verification(&mut self) -> Result<()>;
}
