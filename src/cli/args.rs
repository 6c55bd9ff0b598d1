//! CLI argument definitions.
//!
//! One long-form boolean flag per installation option, plus the `clean`,
//! `default`, and `upgrade` controls. Unknown flags exit 1 with usage;
//! any argument containing "help" prints usage and exits 0 (handled in
//! `main` before parsing).

use clap::Parser;

/// Roost - bootstrap an IoT development environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "roost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Install system dependencies and the node toolchain
    #[arg(long)]
    pub system_deps: bool,

    /// Create the isolated core environment
    #[arg(long)]
    pub core: bool,

    /// Install the cloudcmd web file manager
    #[arg(long)]
    pub cloudcmd: bool,

    /// Install the Node-RED flow platform
    #[arg(long)]
    pub nodered: bool,

    /// Install and configure nginx
    #[arg(long)]
    pub nginx: bool,

    /// Install and configure the mosquitto MQTT broker
    #[arg(long)]
    pub mosquitto: bool,

    /// Install convenience CLI tools
    #[arg(long)]
    pub tools: bool,

    /// Materialize the starter project template
    #[arg(long)]
    pub template: bool,

    /// Pre-download the esp32 and esp8266 build platforms
    #[arg(long)]
    pub platforms: bool,

    /// Fill the build cache (may take a long time)
    #[arg(long)]
    pub cache: bool,

    /// Grant serial-port access to the current user
    #[arg(long)]
    pub serial: bool,

    /// Replace the wifi access-point firmware (Raspberry Pi only)
    #[arg(long)]
    pub wifi: bool,

    /// Upgrade system packages before installing
    #[arg(long)]
    pub upgrade: bool,

    /// Install the default bundle (everything except the build cache)
    #[arg(long = "default")]
    pub default_bundle: bool,

    /// Remove the existing runtime and caches first (asks for confirmation)
    #[arg(long)]
    pub clean: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Whether any installation option flag was supplied.
    ///
    /// `--clean` and `--default` are modes, not options: a bare `--clean`
    /// falls through to the full wizard, while `--clean --core` suppresses
    /// it. Keep that precedence exactly.
    pub fn any_option_flags(&self) -> bool {
        self.system_deps
            || self.core
            || self.cloudcmd
            || self.nodered
            || self.nginx
            || self.mosquitto
            || self.tools
            || self.template
            || self.platforms
            || self.cache
            || self.serial
            || self.wifi
            || self.upgrade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn zero_flags_parse_to_wizard_mode() {
        let cli = Cli::parse_from(["roost"]);
        assert!(!cli.any_option_flags());
        assert!(!cli.clean);
        assert!(!cli.default_bundle);
    }

    #[test]
    fn option_flags_are_detected() {
        let cli = Cli::parse_from(["roost", "--nginx", "--mosquitto"]);
        assert!(cli.nginx);
        assert!(cli.mosquitto);
        assert!(cli.any_option_flags());
    }

    #[test]
    fn clean_alone_is_not_an_option_flag() {
        let cli = Cli::parse_from(["roost", "--clean"]);
        assert!(cli.clean);
        assert!(!cli.any_option_flags());
    }

    #[test]
    fn default_bundle_is_not_an_option_flag() {
        let cli = Cli::parse_from(["roost", "--default"]);
        assert!(cli.default_bundle);
        assert!(!cli.any_option_flags());
    }

    #[test]
    fn clean_with_core_keeps_the_flag() {
        let cli = Cli::parse_from(["roost", "--clean", "--core"]);
        assert!(cli.clean);
        assert!(cli.core);
        assert!(cli.any_option_flags());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["roost", "--frobnicate"]).is_err());
    }

    #[test]
    fn help_and_version_parse_to_display_kinds() {
        // main maps these kinds to a zero exit; anything else exits 1.
        use clap::error::ErrorKind;
        let help = Cli::try_parse_from(["roost", "-h"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        let version = Cli::try_parse_from(["roost", "--version"]).unwrap_err();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        let unknown = Cli::try_parse_from(["roost", "--frobnicate"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownArgument);
    }
}
