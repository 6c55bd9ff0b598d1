//! Priority-ordered platform detection.
//!
//! Modeled as a fixed list of probes checked in sequence; the first match
//! wins. The probe surface is a trait so tests can run against a synthetic
//! host instead of the real one (same pattern as the environment detector's
//! injectable lookup).

use std::path::Path;

use crate::error::{Result, RoostError};

use super::profile::PlatformProfile;

/// Host inspection surface used by detection.
pub trait HostProbe {
    /// Look up an environment variable.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Check whether an executable is on PATH.
    fn has_command(&self, name: &str) -> bool;

    /// Read a small marker file, if present.
    fn read_marker(&self, path: &str) -> Option<String>;
}

/// Probe backed by the real host.
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn has_command(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn read_marker(&self, path: &str) -> Option<String> {
        if !Path::new(path).exists() {
            return None;
        }
        std::fs::read_to_string(path).ok()
    }
}

/// Device-tree model file identifying single-board devices.
const DEVICE_MODEL_PATH: &str = "/proc/device-tree/model";

/// Detect the host platform.
pub fn detect() -> Result<PlatformProfile> {
    detect_with(&SystemProbe)
}

/// Detect the host platform through an explicit probe.
///
/// Checked in priority order:
/// 1. Termux — `TERMUX_VERSION` set or `$PREFIX` under the Termux app.
///    Termux also ships apt, so it must outrank the Debian probe.
/// 2. Raspberry Pi — apt present and the device-tree model names a Pi.
/// 3. Debian/Ubuntu — `apt-get` on PATH.
/// 4. Fedora — `dnf` on PATH.
/// 5. Arch — `pacman` on PATH.
pub fn detect_with(probe: &dyn HostProbe) -> Result<PlatformProfile> {
    if probe.env_var("TERMUX_VERSION").is_some()
        || probe
            .env_var("PREFIX")
            .is_some_and(|p| p.contains("com.termux"))
    {
        return Ok(PlatformProfile::Termux);
    }

    if probe.has_command("apt-get") {
        let model = probe.read_marker(DEVICE_MODEL_PATH).unwrap_or_default();
        if model.starts_with("Raspberry Pi") {
            return Ok(PlatformProfile::RaspberryPi);
        }
        return Ok(PlatformProfile::Debian);
    }

    if probe.has_command("dnf") {
        return Ok(PlatformProfile::Fedora);
    }

    if probe.has_command("pacman") {
        return Ok(PlatformProfile::Arch);
    }

    Err(RoostError::UnsupportedPlatform)
}
