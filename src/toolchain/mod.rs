//! Node toolchain provisioning (nvm + node).
//!
//! Two version-gate call sites with distinct policies:
//!
//! - The version manager only has a floor: an empty probe counts as 0.0.0
//!   (not installed) and triggers a managed install of the pinned minimum.
//! - The runtime is bounded on both sides. Out of range gets exactly one
//!   remediation (install the pinned maximum), one re-check, then fatal.
//!
//! On success the installed runtime version is bound to a fixed alias so
//! later steps request the toolchain by stable name.

use crate::error::{Result, RoostError};
use crate::install::Installer;
use crate::version::{self, Version, VersionCheck, VersionSpec};

/// Minimum (and pinned install) nvm release.
pub const MANAGER_MIN: &str = "0.39.0";

/// Supported node range, inclusive. The maximum is what remediation installs.
pub const RUNTIME_MIN: &str = "18.0.0";
pub const RUNTIME_MAX: &str = "20.12.2";

/// Alias later steps use to request the runtime.
pub const RUNTIME_ALIAS: &str = "roost";

fn pinned(tool: &'static str, raw: &str) -> Result<Version> {
    raw.parse()
        .map_err(|_| RoostError::VersionUnreadable {
            tool,
            output: raw.to_string(),
        })
}

fn probe(reported: &str) -> Version {
    // An empty or unparseable probe means the tool is not installed.
    version::extract(reported).unwrap_or_else(Version::zero)
}

/// Ensure the version manager meets the pinned minimum.
pub fn ensure_version_manager(installer: &mut dyn Installer) -> Result<()> {
    let reported = installer.version_manager_version()?;
    let installed = probe(&reported);
    let spec = VersionSpec::at_least(pinned("nvm", MANAGER_MIN)?);

    if version::check(&installed, &spec) == VersionCheck::BelowMin {
        tracing::info!(%installed, pinned = MANAGER_MIN, "installing version manager");
        installer.install_version_manager(MANAGER_MIN)?;
    } else {
        tracing::debug!(%installed, "version manager is recent enough");
    }
    Ok(())
}

/// Ensure the runtime lies within the supported range and bind the alias.
pub fn ensure_runtime(installer: &mut dyn Installer) -> Result<()> {
    let spec = VersionSpec::between(
        pinned("node", RUNTIME_MIN)?,
        pinned("node", RUNTIME_MAX)?,
    );

    let mut installed = probe(&installer.runtime_version()?);
    if version::check(&installed, &spec) != VersionCheck::Ok {
        // Exactly one remediation attempt, then one re-check.
        tracing::info!(%installed, pinned = RUNTIME_MAX, "runtime out of range, installing pinned version");
        installer.install_runtime(RUNTIME_MAX)?;
        installed = probe(&installer.runtime_version()?);
        if version::check(&installed, &spec) != VersionCheck::Ok {
            return Err(RoostError::VersionOutOfRange {
                tool: "node",
                installed: installed.to_string(),
                min: RUNTIME_MIN.to_string(),
                max: RUNTIME_MAX.to_string(),
            });
        }
    }

    installer.set_runtime_alias(RUNTIME_ALIAS, &installed.to_string())
}

/// Provision the full toolchain: manager first, then the runtime gate.
pub fn ensure_toolchain(installer: &mut dyn Installer) -> Result<()> {
    ensure_version_manager(installer)?;
    ensure_runtime(installer)
}
