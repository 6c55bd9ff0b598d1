//! Shell command execution.
//!
//! All external installer invocations funnel through [`execute`], which
//! applies the platform profile's command environment (e.g. the Termux
//! library-path remapping) on top of the process environment.

use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{Result, RoostError};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited 0.
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<std::path::PathBuf>,

    /// Environment overrides (merged with the process env).
    pub env: HashMap<String, String>,

    /// Capture output instead of inheriting the terminal.
    pub capture: bool,
}

/// Execute a command through the login shell.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(login_shell());
    cmd.arg("-lc");
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|_| RoostError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let read = |bytes: &[u8]| {
        if options.capture {
            String::from_utf8_lossy(bytes).to_string()
        } else {
            String::new()
        }
    };

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: read(&output.stdout),
        stderr: read(&output.stderr),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Execute a command and fail on a non-zero exit.
pub fn execute_checked(command: &str, env: &HashMap<String, String>) -> Result<()> {
    let options = CommandOptions {
        env: env.clone(),
        ..Default::default()
    };
    let result = execute(command, &options)?;
    if result.success {
        Ok(())
    } else {
        Err(RoostError::CommandFailed {
            command: command.to_string(),
            code: result.exit_code,
        })
    }
}

/// Execute a command, capturing output; non-zero exits are reported in the
/// result rather than as an error.
pub fn execute_quiet(
    command: &str,
    cwd: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<CommandResult> {
    let options = CommandOptions {
        cwd: cwd.map(|p| p.to_path_buf()),
        env: env.clone(),
        capture: true,
    };
    execute(command, &options)
}

fn login_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let options = CommandOptions {
            capture: true,
            ..Default::default()
        };
        let result = execute("echo hello", &options).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let options = CommandOptions {
            capture: true,
            ..Default::default()
        };
        let result = execute("exit 3", &options).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_with_env_override() {
        let mut options = CommandOptions {
            capture: true,
            ..Default::default()
        };
        options
            .env
            .insert("ROOST_TEST_VAR".to_string(), "wired".to_string());
        let result = execute("echo $ROOST_TEST_VAR", &options).unwrap();
        assert!(result.stdout.contains("wired"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            capture: true,
            ..Default::default()
        };
        let result = execute("pwd", &options).unwrap();
        assert!(result.success);
    }

    #[test]
    fn execute_checked_surfaces_exit_code() {
        let err = execute_checked("exit 7", &HashMap::new()).unwrap_err();
        match err {
            RoostError::CommandFailed { code, .. } => assert_eq!(code, Some(7)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn execute_quiet_captures_silently() {
        let result = execute_quiet("echo quiet", None, &HashMap::new()).unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("quiet"));
    }
}
