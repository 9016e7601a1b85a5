use crate::domain::prerelease;
use crate::error::{BumpError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Release type decision (what a commit history or the user asks for)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl ReleaseType {
    /// Priority used when comparing an in-flight prerelease line with a new request.
    /// major - 2, minor - 1, patch - 0
    pub fn priority(self) -> u8 {
        match self {
            ReleaseType::Major => 2,
            ReleaseType::Minor => 1,
            ReleaseType::Patch => 0,
        }
    }

    /// The plain increment for this release type
    pub fn increment(self) -> Increment {
        match self {
            ReleaseType::Major => Increment::Major,
            ReleaseType::Minor => Increment::Minor,
            ReleaseType::Patch => Increment::Patch,
        }
    }

    /// The increment that starts a new prerelease line at this release type
    pub fn pre_increment(self) -> Increment {
        match self {
            ReleaseType::Major => Increment::PreMajor,
            ReleaseType::Minor => Increment::PreMinor,
            ReleaseType::Patch => Increment::PrePatch,
        }
    }
}

impl FromStr for ReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            _ => Err(BumpError::InvalidReleaseType(s.to_string())),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
        }
    }
}

/// Version increments, named after their `semver` counterparts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    PreRelease,
}

/// Increment a version.
///
/// Follows the reference semver semantics:
/// - a plain increment on a prerelease that already targets that component
///   only drops the prerelease (`2.0.0-rc.1` + major -> `2.0.0`)
/// - `pre*` increments bump the component and start `{identifier}.0`
/// - `PreRelease` continues the current prerelease line, or starts one on the
///   next patch when the version is a release
///
/// Build metadata is always dropped.
pub fn increment(current: &Version, kind: Increment, identifier: Option<&str>) -> Result<Version> {
    let mut next = Version {
        build: BuildMetadata::EMPTY,
        ..current.clone()
    };

    match kind {
        Increment::Major => {
            if next.minor != 0 || next.patch != 0 || next.pre.is_empty() {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        Increment::Minor => {
            if next.patch != 0 || next.pre.is_empty() {
                next.minor += 1;
            }
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        Increment::Patch => {
            if next.pre.is_empty() {
                next.patch += 1;
            }
            next.pre = Prerelease::EMPTY;
        }
        Increment::PreMajor => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
            next.pre = prerelease::next_prerelease(&Prerelease::EMPTY, identifier)?;
        }
        Increment::PreMinor => {
            next.minor += 1;
            next.patch = 0;
            next.pre = prerelease::next_prerelease(&Prerelease::EMPTY, identifier)?;
        }
        Increment::PrePatch => {
            next.patch += 1;
            next.pre = prerelease::next_prerelease(&Prerelease::EMPTY, identifier)?;
        }
        Increment::PreRelease => {
            if next.pre.is_empty() {
                next.patch += 1;
            }
            next.pre = prerelease::next_prerelease(&next.pre, identifier)?;
        }
    }

    Ok(next)
}

/// Same `major.minor.patch` core
pub fn same_core(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor && a.patch == b.patch
}
