//! Installation options.
//!
//! Options are a closed set of struct fields, never string keys, so an
//! unknown option is a compile-time error. Resolution works on a
//! [`OptionDraft`] of tri-state values and produces an [`InstallOptions`]
//! where everything is a definite yes/no.

pub mod resolver;

pub use resolver::resolve;

use crate::cli::Cli;

/// Tri-state value used while options are being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unset,
    Yes,
    No,
}

impl TriState {
    /// A supplied CLI flag means yes; an absent one leaves the option open.
    pub fn from_flag(set: bool) -> Self {
        if set {
            Self::Yes
        } else {
            Self::Unset
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

/// Options mid-resolution.
#[derive(Debug, Clone, Default)]
pub struct OptionDraft {
    pub system_deps: TriState,
    pub core: TriState,
    pub cloudcmd: TriState,
    pub nodered: TriState,
    pub nginx: TriState,
    pub mosquitto: TriState,
    pub tools: TriState,
    pub template: TriState,
    pub platforms: TriState,
    pub cache: TriState,
    pub serial: TriState,
    pub wifi: TriState,
    pub upgrade: TriState,
}

impl OptionDraft {
    /// Seed the draft from explicit CLI flags.
    pub fn from_args(args: &Cli) -> Self {
        Self {
            system_deps: TriState::from_flag(args.system_deps),
            core: TriState::from_flag(args.core),
            cloudcmd: TriState::from_flag(args.cloudcmd),
            nodered: TriState::from_flag(args.nodered),
            nginx: TriState::from_flag(args.nginx),
            mosquitto: TriState::from_flag(args.mosquitto),
            tools: TriState::from_flag(args.tools),
            template: TriState::from_flag(args.template),
            platforms: TriState::from_flag(args.platforms),
            cache: TriState::from_flag(args.cache),
            serial: TriState::from_flag(args.serial),
            wifi: TriState::from_flag(args.wifi),
            upgrade: TriState::from_flag(args.upgrade),
        }
    }

    /// Finish resolution. Anything still unset resolves to no, which is
    /// exactly the explicit-mode rule for unselected options.
    pub fn finish(self) -> InstallOptions {
        let as_bool = |t: TriState| matches!(t, TriState::Yes);
        InstallOptions {
            system_deps: as_bool(self.system_deps),
            core: as_bool(self.core),
            cloudcmd: as_bool(self.cloudcmd),
            nodered: as_bool(self.nodered),
            nginx: as_bool(self.nginx),
            mosquitto: as_bool(self.mosquitto),
            tools: as_bool(self.tools),
            template: as_bool(self.template),
            platforms: as_bool(self.platforms),
            cache: as_bool(self.cache),
            serial: as_bool(self.serial),
            wifi: as_bool(self.wifi),
            upgrade: as_bool(self.upgrade),
        }
    }
}

/// Fully resolved installation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub system_deps: bool,
    pub core: bool,
    pub cloudcmd: bool,
    pub nodered: bool,
    pub nginx: bool,
    pub mosquitto: bool,
    pub tools: bool,
    pub template: bool,
    pub platforms: bool,
    pub cache: bool,
    pub serial: bool,
    pub wifi: bool,
    pub upgrade: bool,
}

impl InstallOptions {
    /// The package index is refreshed once if any step below needs it.
    pub fn needs_index_refresh(&self) -> bool {
        self.nginx || self.mosquitto || self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_seed_yes_and_leave_rest_unset() {
        let cli = Cli::parse_from(["roost", "--nginx"]);
        let draft = OptionDraft::from_args(&cli);
        assert_eq!(draft.nginx, TriState::Yes);
        assert!(draft.mosquitto.is_unset());
        assert!(draft.core.is_unset());
    }

    #[test]
    fn finish_resolves_unset_to_no() {
        let options = OptionDraft {
            nginx: TriState::Yes,
            ..Default::default()
        }
        .finish();
        assert!(options.nginx);
        assert!(!options.mosquitto);
        assert!(!options.cache);
    }

    #[test]
    fn index_refresh_follows_selected_packages() {
        let mut options = InstallOptions::default();
        assert!(!options.needs_index_refresh());
        options.tools = true;
        assert!(options.needs_index_refresh());
        options.tools = false;
        options.mosquitto = true;
        assert!(options.needs_index_refresh());
    }
}
