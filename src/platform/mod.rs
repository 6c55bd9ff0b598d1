//! Platform profiles and priority-ordered detection.
//!
//! Exactly one [`PlatformProfile`] is selected per run. Detection order
//! encodes precedence, not mere presence: Termux also exposes a generic
//! apt, so it must be probed first.

pub mod detect;
pub mod profile;

pub use detect::{detect, detect_with, HostProbe, SystemProbe};
pub use profile::PlatformProfile;
