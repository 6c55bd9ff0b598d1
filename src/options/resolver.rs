//! Option resolution: flags, wizard, default bundle, clean mode.
//!
//! Three mutually exclusive modes, with a precedence that must not be
//! "cleaned up": a bare `--clean` falls through to the full wizard after
//! confirmation, while `--clean` combined with any option flag asks no
//! questions at all.

use std::path::Path;

use crate::cli::Cli;
use crate::environment::Environment;
use crate::error::{Result, RoostError};
use crate::platform::PlatformProfile;
use crate::ui::Prompter;

use super::{InstallOptions, OptionDraft, TriState};

/// Resolve user intent into a definite option set.
pub fn resolve(
    args: &Cli,
    env: &Environment,
    profile: PlatformProfile,
    prompter: &mut dyn Prompter,
) -> Result<InstallOptions> {
    let mut draft = OptionDraft::from_args(args);

    // Without a runtime there is nothing to install into; this forcing
    // happens before any mode logic.
    if !env.runtime_exists() {
        draft.core = TriState::Yes;
    }

    if args.clean {
        let confirmed =
            prompter.confirm("Remove the existing runtime and all caches?", false)?;
        if !confirmed {
            return Err(RoostError::CleanDeclined);
        }
        remove_tree(env.data_dir())?;
        remove_tree(env.cache_dir())?;
        // The runtime is gone now, so a core install is mandatory again.
        draft.core = TriState::Yes;

        if !args.any_option_flags() && !args.default_bundle {
            // Bare clean behaves like a zero-argument invocation.
            run_wizard(&mut draft, profile, prompter)?;
            return Ok(draft.finish());
        }
    }

    if args.default_bundle {
        apply_default_bundle(&mut draft, profile);
        return Ok(draft.finish());
    }

    if args.any_option_flags() {
        // Explicit selection suppresses the wizard; unset options stay no.
        return Ok(draft.finish());
    }

    run_wizard(&mut draft, profile, prompter)?;
    Ok(draft.finish())
}

fn remove_tree(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::info!(path = %path.display(), "removing");
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// The default bundle: everything on except the build cache; the firmware
/// fix only applies to the single-board device; upgrade is forced.
fn apply_default_bundle(draft: &mut OptionDraft, profile: PlatformProfile) {
    draft.system_deps = TriState::Yes;
    draft.core = TriState::Yes;
    draft.cloudcmd = TriState::Yes;
    draft.nodered = TriState::Yes;
    draft.nginx = TriState::Yes;
    draft.mosquitto = TriState::Yes;
    draft.tools = TriState::Yes;
    draft.template = TriState::Yes;
    draft.platforms = TriState::Yes;
    draft.serial = TriState::Yes;
    draft.cache = TriState::No;
    draft.wifi = TriState::from_bool(profile.is_single_board());
    draft.upgrade = TriState::Yes;
}

/// Ask a yes/no question for every option still unset.
fn run_wizard(
    draft: &mut OptionDraft,
    profile: PlatformProfile,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut ask = |slot: &mut TriState, question: &str, default: bool| -> Result<()> {
        if slot.is_unset() {
            *slot = TriState::from_bool(prompter.confirm(question, default)?);
        }
        Ok(())
    };

    ask(
        &mut draft.system_deps,
        "Install system dependencies and the node toolchain?",
        true,
    )?;
    ask(&mut draft.upgrade, "Upgrade system packages first?", true)?;
    ask(
        &mut draft.core,
        "Create the isolated core environment?",
        true,
    )?;
    ask(
        &mut draft.cloudcmd,
        "Install the cloudcmd web file manager?",
        true,
    )?;
    ask(
        &mut draft.nodered,
        "Install the Node-RED flow platform?",
        true,
    )?;
    ask(&mut draft.nginx, "Install and configure nginx?", true)?;
    ask(
        &mut draft.mosquitto,
        "Install the mosquitto MQTT broker?",
        true,
    )?;
    ask(&mut draft.tools, "Install convenience CLI tools?", true)?;
    ask(
        &mut draft.template,
        "Create the starter project template?",
        true,
    )?;
    ask(
        &mut draft.platforms,
        "Pre-download the esp32 and esp8266 build platforms?",
        true,
    )?;
    ask(
        &mut draft.cache,
        "Fill the build cache now? This can take a long time",
        false,
    )?;

    if profile.supports_serial_grant() {
        ask(
            &mut draft.serial,
            "Grant serial-port access to your user?",
            true,
        )?;
    }

    if profile.is_single_board() {
        ask(
            &mut draft.wifi,
            "Replace the wifi access-point firmware?",
            true,
        )?;
    }

    // Anything left unset (skipped questions) resolves to no in finish().
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ScriptedPrompter;
    use clap::Parser;

    fn env_with_runtime(temp: &tempfile::TempDir) -> Environment {
        let env = Environment::with_home(temp.path().to_path_buf(), true);
        std::fs::create_dir_all(env.venv_dir()).unwrap();
        env
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["roost"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn missing_runtime_forces_core_in_explicit_mode() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = Environment::with_home(temp.path().to_path_buf(), true);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options = resolve(
            &cli(&["--nginx"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap();

        assert!(options.core);
        assert!(options.nginx);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn explicit_flags_leave_everything_else_off() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options = resolve(
            &cli(&["--nginx", "--mosquitto"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap();

        assert!(!options.core);
        assert!(options.nginx);
        assert!(options.mosquitto);
        assert!(!options.cloudcmd);
        assert!(!options.cache);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn wizard_defaults_match_the_documented_bundle() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options =
            resolve(&cli(&[]), &env, PlatformProfile::Debian, &mut prompter).unwrap();

        assert!(options.system_deps);
        assert!(options.core);
        assert!(options.cloudcmd);
        assert!(options.nodered);
        assert!(options.nginx);
        assert!(options.mosquitto);
        assert!(options.tools);
        assert!(options.template);
        assert!(options.platforms);
        assert!(options.serial);
        assert!(options.upgrade);
        // The cache question defaults to no even though the rest default yes.
        assert!(!options.cache);
        // Not a Raspberry Pi, so the firmware question was never asked.
        assert!(!options.wifi);
    }

    #[test]
    fn wizard_skips_serial_question_on_termux() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options =
            resolve(&cli(&[]), &env, PlatformProfile::Termux, &mut prompter).unwrap();

        assert!(!options.serial);
        assert!(!prompter
            .asked
            .iter()
            .any(|q| q.contains("serial-port access")));
    }

    #[test]
    fn wizard_asks_wifi_question_only_on_raspberry_pi() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);

        let mut prompter = ScriptedPrompter::all_defaults();
        let options = resolve(
            &cli(&[]),
            &env,
            PlatformProfile::RaspberryPi,
            &mut prompter,
        )
        .unwrap();
        assert!(options.wifi);
        assert!(prompter.asked.iter().any(|q| q.contains("firmware")));

        let mut prompter = ScriptedPrompter::all_defaults();
        let options =
            resolve(&cli(&[]), &env, PlatformProfile::Fedora, &mut prompter).unwrap();
        assert!(!options.wifi);
        assert!(!prompter.asked.iter().any(|q| q.contains("firmware")));
    }

    #[test]
    fn default_bundle_ignores_wizard_entirely() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options = resolve(
            &cli(&["--default"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap();

        assert!(options.core && options.cloudcmd && options.nodered);
        assert!(options.nginx && options.mosquitto && options.tools);
        assert!(options.template && options.platforms && options.serial);
        assert!(options.upgrade);
        assert!(!options.cache);
        assert!(!options.wifi);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn default_bundle_enables_firmware_fix_on_raspberry_pi() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let mut prompter = ScriptedPrompter::all_defaults();

        let options = resolve(
            &cli(&["--default"]),
            &env,
            PlatformProfile::RaspberryPi,
            &mut prompter,
        )
        .unwrap();

        assert!(options.wifi);
    }

    #[test]
    fn declined_clean_aborts_and_touches_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);
        let marker = env.data_dir().join("keep.txt");
        std::fs::write(&marker, "precious").unwrap();

        // Clean confirmation defaults to no; an empty answer declines.
        let mut prompter = ScriptedPrompter::all_defaults();
        let err = resolve(
            &cli(&["--clean"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap_err();

        assert!(matches!(err, RoostError::CleanDeclined));
        assert!(marker.exists());
    }

    #[test]
    fn confirmed_bare_clean_falls_through_to_wizard() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);

        let mut prompter = ScriptedPrompter::new(vec![Some(true)]);
        let options = resolve(
            &cli(&["--clean"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap();

        assert!(!env.data_dir().exists());
        // Wizard ran: the cache question was asked and defaulted to no.
        assert!(prompter.asked.iter().any(|q| q.contains("build cache")));
        assert!(options.core);
        assert!(!options.cache);
    }

    #[test]
    fn clean_with_flags_asks_only_the_confirmation() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = env_with_runtime(&temp);

        let mut prompter = ScriptedPrompter::new(vec![Some(true)]);
        let options = resolve(
            &cli(&["--clean", "--nginx"]),
            &env,
            PlatformProfile::Debian,
            &mut prompter,
        )
        .unwrap();

        assert_eq!(prompter.asked.len(), 1);
        assert!(options.nginx);
        // Clean removed the runtime, so core comes back on.
        assert!(options.core);
        assert!(!options.mosquitto);
    }
}
