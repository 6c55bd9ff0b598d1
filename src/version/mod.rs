//! Bounded dotted-version comparison.
//!
//! Versions are plain dotted numerics; missing segments compare as 0 and
//! there are no pre-release or build-metadata semantics. Probe output like
//! `v20.1.0` is reduced to a version with [`extract`].

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// A dotted numeric version.
///
/// Equality follows the zero-padded ordering, so `1.2` equals `1.2.0`.
#[derive(Debug, Clone, Eq)]
pub struct Version(Vec<u64>);

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Version {
    /// The "not installed" version.
    pub fn zero() -> Self {
        Self(vec![0])
    }

    pub fn segments(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty version string".to_string());
        }
        let segments = trimmed
            .split('.')
            .map(|seg| {
                seg.parse::<u64>()
                    .map_err(|_| format!("invalid version segment {:?} in {:?}", seg, s))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

/// Extract the first dotted numeric version from probe output.
///
/// Returns `None` when the output holds nothing version-shaped, e.g. an
/// empty string from a tool that is not installed.
pub fn extract(output: &str) -> Option<Version> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)*)").expect("static regex"));
    re.find(output)?.as_str().parse().ok()
}

/// A bounded version range.
#[derive(Debug, Clone)]
pub struct VersionSpec {
    pub min: Version,
    /// Inclusive upper bound; `None` means "meeting the minimum suffices".
    pub max: Option<Version>,
}

impl VersionSpec {
    pub fn at_least(min: Version) -> Self {
        Self { min, max: None }
    }

    pub fn between(min: Version, max: Version) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }
}

/// Outcome of checking an installed version against a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    Ok,
    BelowMin,
    AboveMax,
}

/// Check an installed version against a bounded range (inclusive).
pub fn check(installed: &Version, spec: &VersionSpec) -> VersionCheck {
    if installed < &spec.min {
        return VersionCheck::BelowMin;
    }
    if let Some(max) = &spec.max {
        if installed > max {
            return VersionCheck::AboveMax;
        }
    }
    VersionCheck::Ok
}
