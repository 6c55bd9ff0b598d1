//! Roost CLI entry point.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use roost::cli::Cli;
use roost::environment::Environment;
use roost::steps::StepStatus;
use roost::ui::{self, TerminalPrompter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("roost=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roost=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    // Any argument containing "help" prints usage and exits 0.
    if std::env::args().skip(1).any(|arg| arg.contains("help")) {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    }

    // Unknown flags exit 1 with usage, not clap's default 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help (`-h`; long help is pre-scanned above) and `--version`
            // surface as clap "errors" but are successful exits.
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp
                | clap::error::ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_tracing(cli.debug);
    tracing::debug!("roost starting with args: {:?}", cli);

    let env = Environment::from_process();
    let mut prompter = TerminalPrompter::new();

    match roost::orchestrator::run(&cli, &env, &mut prompter) {
        Ok(outcomes) => {
            let completed = outcomes
                .iter()
                .filter(|o| o.status == StepStatus::Completed)
                .count();
            let skipped = outcomes.len() - completed;
            ui::success(&format!(
                "done: {} steps completed, {} already satisfied",
                completed, skipped
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
