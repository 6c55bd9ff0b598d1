//! Roost - bootstrap a multi-component IoT development environment.
//!
//! Roost turns a sparse set of user intents (CLI flags, an interactive
//! wizard, or the default bundle) into a deterministic, ordered, idempotent
//! sequence of installation steps, each gated by version and platform
//! compatibility checks, and persists the resolved decisions.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`environment`] - Activation check and the fixed on-disk layout
//! - [`error`] - Error types and result aliases
//! - [`install`] - External installer collaborators
//! - [`options`] - Installation options and resolution
//! - [`orchestrator`] - Top-level run wiring
//! - [`platform`] - Platform profiles and detection
//! - [`shell`] - Shell command execution
//! - [`state`] - Persisted installation record
//! - [`steps`] - Ordered, idempotent step execution
//! - [`toolchain`] - Node toolchain provisioning (nvm + node)
//! - [`ui`] - Prompts, spinners, and styled output
//! - [`version`] - Bounded dotted-version comparison
//!
//! # Example
//!
//! ```
//! use roost::version::{check, Version, VersionCheck, VersionSpec};
//!
//! let installed: Version = "20.11.1".parse().unwrap();
//! let spec = VersionSpec::between("18.0.0".parse().unwrap(), "20.12.2".parse().unwrap());
//! assert_eq!(check(&installed, &spec), VersionCheck::Ok);
//! ```

pub mod cli;
pub mod environment;
pub mod error;
pub mod install;
pub mod options;
pub mod orchestrator;
pub mod platform;
pub mod shell;
pub mod state;
pub mod steps;
pub mod toolchain;
pub mod ui;
pub mod version;

pub use error::{Result, RoostError};
