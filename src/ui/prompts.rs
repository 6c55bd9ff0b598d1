//! Interactive prompts.

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{Result, RoostError};

use super::Prompter;

/// Convert dialoguer errors to RoostError.
fn map_dialoguer_err(e: dialoguer::Error) -> RoostError {
    RoostError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompter backed by the terminal.
///
/// Dialoguer's `Confirm` implements the wizard contract: empty input takes
/// the default, anything other than y/n re-prompts.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&prompt_theme())
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(map_dialoguer_err)
    }
}
