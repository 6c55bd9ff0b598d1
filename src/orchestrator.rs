//! Top-level run orchestration.
//!
//! Wires the components together in the only legal order: activation check,
//! platform detection, option resolution, step execution. Everything after
//! detection receives the immutable [`Environment`] and the single detected
//! profile.

use crate::cli::Cli;
use crate::environment::Environment;
use crate::error::Result;
use crate::install::SystemInstaller;
use crate::options;
use crate::platform;
use crate::steps::{Executor, StepOutcome};
use crate::ui::Prompter;

/// Run a full installation pass.
pub fn run(args: &Cli, env: &Environment, prompter: &mut dyn Prompter) -> Result<Vec<StepOutcome>> {
    // The marker check precedes all other logic.
    env.ensure_activated()?;

    let profile = platform::detect()?;
    tracing::info!(%profile, "platform detected");

    let options = options::resolve(args, env, profile, prompter)?;
    tracing::debug!(?options, "options resolved");

    let mut installer = SystemInstaller::new(profile, env.clone());
    Executor::new(env, profile, &options).run(&mut installer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoostError;
    use crate::ui::ScriptedPrompter;

    #[test]
    fn inactive_shell_fails_before_detection() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = Environment::with_home(temp.path().to_path_buf(), false);
        let mut prompter = ScriptedPrompter::all_defaults();

        let err = run(&Cli::default(), &env, &mut prompter).unwrap_err();
        assert!(matches!(err, RoostError::NotActivated { .. }));
        assert!(prompter.asked.is_empty());
    }
}
