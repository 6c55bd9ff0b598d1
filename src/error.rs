//! Error types for roost operations.
//!
//! This module defines [`RoostError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Environment errors (missing activation marker, unsupported platform,
//!   unreadable directories) are fatal and never retried
//! - Version errors get exactly one remediation attempt before becoming fatal
//! - Use `anyhow::Error` (via `RoostError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for roost operations.
#[derive(Debug, Error)]
pub enum RoostError {
    /// The process was started outside an activated roost shell.
    #[error("roost shell is not active: set {var}={expected} (run `roost-shell` first)")]
    NotActivated {
        var: &'static str,
        expected: &'static str,
    },

    /// No supported package manager was found on the host.
    #[error("no supported package manager found on this host")]
    UnsupportedPlatform,

    /// A directory the orchestrator must read is missing or unreadable.
    #[error("required directory is not readable: {path}")]
    DirectoryUnreadable { path: PathBuf },

    /// The user declined the clean-mode confirmation.
    #[error("clean aborted: confirmation declined")]
    CleanDeclined,

    /// A toolchain version is outside the supported range after remediation.
    #[error("{tool} {installed} is outside the supported range {min}..={max}")]
    VersionOutOfRange {
        tool: &'static str,
        installed: String,
        min: String,
        max: String,
    },

    /// A version probe produced output no version could be read from.
    #[error("could not read a version from {tool} output: {output:?}")]
    VersionUnreadable { tool: &'static str, output: String },

    /// External command failed.
    #[error("command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Installation step failed.
    #[error("step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for roost operations.
pub type Result<T> = std::result::Result<T, RoostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_activated_names_variable_and_sentinel() {
        let err = RoostError::NotActivated {
            var: "ROOST_ACTIVATED",
            expected: "1",
        };
        let msg = err.to_string();
        assert!(msg.contains("ROOST_ACTIVATED"));
        assert!(msg.contains("=1"));
    }

    #[test]
    fn directory_unreadable_displays_path() {
        let err = RoostError::DirectoryUnreadable {
            path: PathBuf::from("/opt/roost/bin"),
        };
        assert!(err.to_string().contains("/opt/roost/bin"));
    }

    #[test]
    fn version_out_of_range_displays_bounds() {
        let err = RoostError::VersionOutOfRange {
            tool: "node",
            installed: "21.1.0".into(),
            min: "18.0.0".into(),
            max: "20.12.2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("node"));
        assert!(msg.contains("21.1.0"));
        assert!(msg.contains("18.0.0"));
        assert!(msg.contains("20.12.2"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = RoostError::CommandFailed {
            command: "apt-get install nginx".into(),
            code: Some(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install nginx"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn step_failed_displays_step_and_message() {
        let err = RoostError::StepFailed {
            step: "mosquitto".into(),
            message: "broker package unavailable".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mosquitto"));
        assert!(msg.contains("broker package unavailable"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RoostError = io_err.into();
        assert!(matches!(err, RoostError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(RoostError::CleanDeclined)
        }
        assert!(returns_error().is_err());
    }
}
