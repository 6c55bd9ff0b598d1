//! Terminal interaction.
//!
//! The [`Prompter`] trait abstracts every yes/no question the wizard asks,
//! so tests can script answers. The terminal implementation lives in
//! [`prompts`]; styled status output helpers live here.

pub mod prompts;
pub mod spinner;

pub use prompts::TerminalPrompter;
pub use spinner::long_step_spinner;

use std::collections::VecDeque;

use console::style;

use crate::error::Result;

/// Yes/no question surface.
///
/// Empty input resolves to the declared default; anything other than a
/// case-insensitive y/n re-prompts. The retry loop is unbounded by design:
/// a human is at the keyboard and EOF surfaces as an error.
pub trait Prompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Prompter that replays scripted answers, for tests and tooling.
///
/// `None` entries accept the question's default; an exhausted script also
/// accepts defaults.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<bool>>,
    /// Questions seen, in order.
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Option<bool>>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }

    /// A prompter that accepts every default.
    pub fn all_defaults() -> Self {
        Self::default()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().flatten().unwrap_or(default))
    }
}

/// Print a success line.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print a skip line.
pub fn skipped(msg: &str) {
    println!("{} {}", style("⊘").dim(), style(msg).dim());
}

/// Print an error line.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompter_replays_answers() {
        let mut prompter = ScriptedPrompter::new(vec![Some(false), Some(true)]);
        assert!(!prompter.confirm("first?", true).unwrap());
        assert!(prompter.confirm("second?", false).unwrap());
    }

    #[test]
    fn scripted_prompter_none_takes_default() {
        let mut prompter = ScriptedPrompter::new(vec![None]);
        assert!(prompter.confirm("default yes?", true).unwrap());
    }

    #[test]
    fn exhausted_script_takes_default() {
        let mut prompter = ScriptedPrompter::all_defaults();
        assert!(!prompter.confirm("default no?", false).unwrap());
    }

    #[test]
    fn scripted_prompter_records_questions() {
        let mut prompter = ScriptedPrompter::all_defaults();
        prompter.confirm("Install nginx?", true).unwrap();
        prompter.confirm("Fill the build cache?", false).unwrap();
        assert_eq!(
            prompter.asked,
            vec!["Install nginx?", "Fill the build cache?"]
        );
    }
}
