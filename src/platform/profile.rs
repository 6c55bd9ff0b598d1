//! Per-platform package-manager verbs and command environment.

use std::collections::HashMap;

/// A detected host platform.
///
/// Immutable once detected; carries the install verbs and the adjusted
/// command environment used for every external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProfile {
    /// Termux on Android. Constrained: no sudo, preload must be neutralized.
    Termux,
    /// Raspberry Pi OS. The only profile eligible for the wifi firmware fix.
    RaspberryPi,
    /// Generic Debian/Ubuntu host.
    Debian,
    /// Fedora host.
    Fedora,
    /// Arch host.
    Arch,
}

impl PlatformProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Termux => "termux",
            Self::RaspberryPi => "raspberry-pi",
            Self::Debian => "debian",
            Self::Fedora => "fedora",
            Self::Arch => "arch",
        }
    }

    /// Whether this profile targets the single-board device.
    pub fn is_single_board(&self) -> bool {
        matches!(self, Self::RaspberryPi)
    }

    /// The serial-permission question makes no sense on Termux.
    pub fn supports_serial_grant(&self) -> bool {
        !matches!(self, Self::Termux)
    }

    /// Refresh the package index.
    pub fn refresh_command(&self) -> &'static str {
        match self {
            Self::Termux => "pkg update -y",
            Self::RaspberryPi | Self::Debian => "sudo apt-get update",
            Self::Fedora => "sudo dnf -y makecache",
            Self::Arch => "sudo pacman -Sy --noconfirm",
        }
    }

    /// Upgrade all installed packages.
    pub fn upgrade_command(&self) -> &'static str {
        match self {
            Self::Termux => "pkg upgrade -y",
            Self::RaspberryPi | Self::Debian => "sudo apt-get -y upgrade",
            Self::Fedora => "sudo dnf -y upgrade",
            Self::Arch => "sudo pacman -Syu --noconfirm",
        }
    }

    /// Install the named packages.
    pub fn install_command(&self, packages: &[&str]) -> String {
        let list = packages.join(" ");
        match self {
            Self::Termux => format!("pkg install -y {}", list),
            Self::RaspberryPi | Self::Debian => {
                format!("sudo apt-get install -y {}", list)
            }
            Self::Fedora => format!("sudo dnf install -y {}", list),
            Self::Arch => format!("sudo pacman -S --needed --noconfirm {}", list),
        }
    }

    /// System dependencies required before creating the core environment.
    pub fn system_packages(&self) -> &'static [&'static str] {
        match self {
            Self::Termux => &["python", "git", "curl", "libffi", "clang", "which"],
            Self::RaspberryPi | Self::Debian => &[
                "build-essential",
                "python3",
                "python3-venv",
                "python3-pip",
                "git",
                "curl",
                "libffi-dev",
            ],
            Self::Fedora => &[
                "gcc",
                "gcc-c++",
                "make",
                "python3",
                "python3-pip",
                "git",
                "curl",
                "libffi-devel",
            ],
            Self::Arch => &["base-devel", "python", "python-pip", "git", "curl", "libffi"],
        }
    }

    /// Convenience CLI tools bundle.
    pub fn tool_packages(&self) -> &'static [&'static str] {
        match self {
            Self::RaspberryPi | Self::Debian => &["tmux", "jq", "mosquitto-clients", "picocom"],
            Self::Fedora => &["tmux", "jq", "mosquitto", "picocom"],
            Self::Arch => &["tmux", "jq", "mosquitto", "picocom"],
            Self::Termux => &["tmux", "jq", "mosquitto", "picocom"],
        }
    }

    pub fn web_server_package(&self) -> &'static str {
        "nginx"
    }

    pub fn mqtt_broker_package(&self) -> &'static str {
        "mosquitto"
    }

    /// Environment adjustments applied to every external invocation.
    ///
    /// Termux injects a preload library that breaks compiled-extension
    /// installs, and its toolchain lives under `$PREFIX`; both must be
    /// remapped. Other profiles run commands unmodified.
    pub fn command_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        if let Self::Termux = self {
            let prefix = std::env::var("PREFIX")
                .unwrap_or_else(|_| "/data/data/com.termux/files/usr".to_string());
            env.insert("LD_PRELOAD".to_string(), String::new());
            env.insert("LD_LIBRARY_PATH".to_string(), format!("{}/lib", prefix));
            let path = std::env::var("PATH").unwrap_or_default();
            env.insert("PATH".to_string(), format!("{}/bin:{}", prefix, path));
        }
        env
    }
}

impl std::fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
