//! Next-version resolution
//!
//! Resolution is a pure function of the current version, the release signal
//! and the prerelease / first-release / skip flags. Everything that talks to
//! the outside world (hooks, commit classification, git) runs before it.

use crate::domain::prerelease::{active_type, identifier_family, next_prerelease};
use crate::domain::version::{increment, same_core, Increment, ReleaseType};
use crate::error::{BumpError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Validated form of the `release_as` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseAs {
    /// `major`, `minor` or `patch`
    Type(ReleaseType),
    /// An exact version, build metadata included
    Exact(Version),
}

impl ReleaseAs {
    /// Parse a `release_as` value.
    ///
    /// Accepts a release type (case-insensitive) or a strict semver string,
    /// optionally prefixed with `v` (`v100.0.0`).
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for ReleaseAs {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(release_type) = trimmed.parse::<ReleaseType>() {
            return Ok(ReleaseAs::Type(release_type));
        }

        let version_text = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .or_else(|| trimmed.strip_prefix('='))
            .unwrap_or(trimmed);

        Version::parse(version_text)
            .map(ReleaseAs::Exact)
            .map_err(|_| BumpError::InvalidReleaseType(s.to_string()))
    }
}

impl fmt::Display for ReleaseAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseAs::Type(t) => write!(f, "{}", t),
            ReleaseAs::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// What drives the bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseSignal {
    /// User override (`--release-as`, config `release_as`, or a prebump hook)
    Explicit(ReleaseAs),
    /// Output of the commit classifier
    Recommended(ReleaseType),
}

/// Inputs to [next_version] besides the current version
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub signal: Option<ReleaseSignal>,
    /// Requested prerelease identifier; `Some("")` asks for bare numeric prereleases
    pub prerelease: Option<String>,
    pub first_release: bool,
    pub skip_bump: bool,
}

/// Compute the next version.
///
/// Precedence: skip, first release, exact override, release type.
pub fn next_version(current: &Version, options: &ResolveOptions) -> Result<Version> {
    if options.skip_bump {
        tracing::debug!(version = %current, "bump skipped, keeping current version");
        return Ok(current.clone());
    }

    if options.first_release {
        tracing::debug!(version = %current, "first release, keeping current version");
        return Ok(current.clone());
    }

    let signal = options.signal.as_ref().ok_or_else(|| {
        BumpError::config("no release type was provided and none could be recommended")
    })?;
    let identifier = options.prerelease.as_deref();

    let next = match signal {
        ReleaseSignal::Explicit(ReleaseAs::Exact(target)) => {
            resolve_exact(current, target, identifier)?
        }
        ReleaseSignal::Explicit(ReleaseAs::Type(release_type)) => {
            resolve_type(current, *release_type, identifier)?
        }
        ReleaseSignal::Recommended(release_type) => {
            let release_type = demote_pre_major(current, *release_type);
            resolve_type(current, release_type, identifier)?
        }
    };

    tracing::debug!(from = %current, to = %next, ?signal, "resolved next version");
    Ok(next)
}

/// Before 1.0.0 a recommended major bump becomes a minor one.
/// Explicit overrides are never demoted.
fn demote_pre_major(current: &Version, recommended: ReleaseType) -> ReleaseType {
    if current.major == 0 && recommended == ReleaseType::Major {
        ReleaseType::Minor
    } else {
        recommended
    }
}

fn resolve_exact(current: &Version, target: &Version, identifier: Option<&str>) -> Result<Version> {
    let mut candidate = Version {
        build: BuildMetadata::EMPTY,
        ..target.clone()
    };

    if let Some(id) = identifier {
        if target.pre.is_empty() {
            candidate.pre = next_prerelease(&Prerelease::EMPTY, Some(id))?;
        } else if identifier_family(&target.pre) != id {
            return Err(BumpError::ConflictingPrerelease {
                release_as: target.to_string(),
                prerelease: id.to_string(),
            });
        }

        // Re-requesting the same release while iterating on a prerelease
        // advances the counter instead of going backwards.
        let order = candidate.cmp_precedence(current);
        let same_line = order == Ordering::Equal
            || (same_core(&candidate, current)
                && !candidate.pre.is_empty()
                && !current.pre.is_empty());
        if order != Ordering::Greater && same_line {
            candidate = increment(current, Increment::PreRelease, Some(id))?;
        }
    }

    candidate.build = target.build.clone();
    Ok(candidate)
}

fn resolve_type(
    current: &Version,
    release_type: ReleaseType,
    identifier: Option<&str>,
) -> Result<Version> {
    let Some(id) = identifier else {
        return increment(current, release_type.increment(), None);
    };

    let continue_line = active_type(current)
        .is_some_and(|active| active == release_type || active.priority() > release_type.priority());

    let kind = if continue_line {
        Increment::PreRelease
    } else {
        release_type.pre_increment()
    };
    increment(current, kind, Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn explicit(s: &str) -> Option<ReleaseSignal> {
        Some(ReleaseSignal::Explicit(ReleaseAs::parse(s).unwrap()))
    }

    fn recommended(t: ReleaseType) -> Option<ReleaseSignal> {
        Some(ReleaseSignal::Recommended(t))
    }

    fn resolve(current: &str, signal: Option<ReleaseSignal>, pre: Option<&str>) -> Result<String> {
        let options = ResolveOptions {
            signal,
            prerelease: pre.map(str::to_string),
            ..Default::default()
        };
        next_version(&v(current), &options).map(|v| v.to_string())
    }

    #[test]
    fn test_release_as_parse() {
        assert_eq!(
            ReleaseAs::parse("major").unwrap(),
            ReleaseAs::Type(ReleaseType::Major)
        );
        assert_eq!(
            ReleaseAs::parse("v100.0.0").unwrap(),
            ReleaseAs::Exact(v("100.0.0"))
        );
        assert_eq!(
            ReleaseAs::parse("1.0.0+build.1").unwrap(),
            ReleaseAs::Exact(v("1.0.0+build.1"))
        );
    }

    #[test]
    fn test_release_as_parse_rejects_invalid() {
        for bad in ["invalid", "10.2", "", "1.2.3.4"] {
            assert!(matches!(
                ReleaseAs::parse(bad),
                Err(BumpError::InvalidReleaseType(_))
            ));
        }
    }

    #[test]
    fn test_skip_bump_keeps_version() {
        let options = ResolveOptions {
            signal: explicit("major"),
            skip_bump: true,
            ..Default::default()
        };
        assert_eq!(next_version(&v("1.0.0"), &options).unwrap(), v("1.0.0"));
    }

    #[test]
    fn test_first_release_keeps_version() {
        let options = ResolveOptions {
            signal: recommended(ReleaseType::Minor),
            first_release: true,
            ..Default::default()
        };
        assert_eq!(next_version(&v("1.0.0"), &options).unwrap(), v("1.0.0"));
    }

    #[test]
    fn test_missing_signal_is_an_error() {
        assert!(resolve("1.0.0", None, None).is_err());
    }

    #[test]
    fn test_release_types() {
        assert_eq!(resolve("1.0.0", explicit("major"), None).unwrap(), "2.0.0");
        assert_eq!(resolve("1.0.0", explicit("minor"), None).unwrap(), "1.1.0");
        assert_eq!(resolve("1.0.0", explicit("patch"), None).unwrap(), "1.0.1");
    }

    #[test]
    fn test_pre_release_types() {
        assert_eq!(
            resolve("1.0.0", explicit("major"), Some("major")).unwrap(),
            "2.0.0-major.0"
        );
        assert_eq!(
            resolve("1.0.0", explicit("minor"), Some("minor")).unwrap(),
            "1.1.0-minor.0"
        );
        assert_eq!(
            resolve("1.0.0", explicit("patch"), Some("patch")).unwrap(),
            "1.0.1-patch.0"
        );
    }

    #[test]
    fn test_pre_major_demotes_recommended_major() {
        assert_eq!(
            resolve("0.5.0", recommended(ReleaseType::Major), None).unwrap(),
            "0.6.0"
        );
        assert_eq!(
            resolve("0.5.0", recommended(ReleaseType::Minor), None).unwrap(),
            "0.6.0"
        );
    }

    #[test]
    fn test_pre_major_honours_explicit_major() {
        assert_eq!(resolve("0.5.0", explicit("major"), None).unwrap(), "1.0.0");
    }

    #[test]
    fn test_recommended_major_after_one_zero() {
        assert_eq!(
            resolve("1.5.0", recommended(ReleaseType::Major), None).unwrap(),
            "2.0.0"
        );
    }

    #[test]
    fn test_exact_version() {
        assert_eq!(resolve("1.0.0", explicit("v100.0.0"), None).unwrap(), "100.0.0");
        assert_eq!(
            resolve("1.0.0", explicit("200.0.0-amazing"), None).unwrap(),
            "200.0.0-amazing"
        );
    }

    #[test]
    fn test_exact_version_keeps_build_metadata() {
        assert_eq!(
            resolve("1.0.0", explicit("1.1.0+build.42"), None).unwrap(),
            "1.1.0+build.42"
        );
    }

    #[test]
    fn test_exact_version_seeds_prerelease() {
        assert_eq!(
            resolve("1.0.0", explicit("100.0.0"), Some("amazing")).unwrap(),
            "100.0.0-amazing.0"
        );
    }

    #[test]
    fn test_exact_version_continues_prerelease_counter() {
        assert_eq!(
            resolve("100.0.0-amazing.0", explicit("100.0.0"), Some("amazing")).unwrap(),
            "100.0.0-amazing.1"
        );
        assert_eq!(
            resolve("100.0.0-amazing.1", explicit("100.0.0-amazing.0"), Some("amazing"))
                .unwrap(),
            "100.0.0-amazing.2"
        );
    }

    #[test]
    fn test_exact_version_newer_than_current_is_adopted() {
        assert_eq!(
            resolve("99.0.0-amazing.0", explicit("100.0.0"), Some("amazing")).unwrap(),
            "100.0.0-amazing.0"
        );
        assert_eq!(
            resolve("99.0.0-amazing.0", explicit("100.0.0-amazing.0"), Some("amazing"))
                .unwrap(),
            "100.0.0-amazing.0"
        );
        assert_eq!(
            resolve("100.0.0-amazing.0", explicit("100.0.0-amazing.3"), Some("amazing"))
                .unwrap(),
            "100.0.0-amazing.3"
        );
    }

    #[test]
    fn test_exact_version_retains_build_when_counter_advances() {
        assert_eq!(
            resolve(
                "100.0.0-amazing.0",
                explicit("100.0.0-amazing.0+build.1234"),
                Some("amazing")
            )
            .unwrap(),
            "100.0.0-amazing.1+build.1234"
        );
    }

    #[test]
    fn test_conflicting_prerelease_identifiers() {
        let err = resolve("1.0.0", explicit("1.2.3-amazing.2"), Some("awesome")).unwrap_err();
        assert!(matches!(err, BumpError::ConflictingPrerelease { .. }));
    }

    #[test]
    fn test_exact_prerelease_without_counter_matches_identifier() {
        assert_eq!(
            resolve("0.9.0", explicit("1.0.0-amazing"), Some("amazing")).unwrap(),
            "1.0.0-amazing"
        );
        let err = resolve("0.9.0", explicit("1.0.0-amazing"), Some("awesome")).unwrap_err();
        assert!(matches!(err, BumpError::ConflictingPrerelease { .. }));
    }

    #[test]
    fn test_prerelease_line_transitions() {
        let step = |current: &str, t: ReleaseType| {
            resolve(current, Some(ReleaseSignal::Explicit(ReleaseAs::Type(t))), Some("dev"))
                .unwrap()
        };
        assert_eq!(step("1.0.0", ReleaseType::Patch), "1.0.1-dev.0");
        assert_eq!(
            resolve("1.0.1-dev.0", recommended(ReleaseType::Patch), Some("dev")).unwrap(),
            "1.0.1-dev.1"
        );
        assert_eq!(step("1.0.1-dev.1", ReleaseType::Minor), "1.1.0-dev.0");
        assert_eq!(step("1.1.0-dev.0", ReleaseType::Minor), "1.1.0-dev.1");
        assert_eq!(
            resolve("1.1.0-dev.1", recommended(ReleaseType::Minor), Some("dev")).unwrap(),
            "1.1.0-dev.2"
        );
    }

    #[test]
    fn test_higher_active_prerelease_absorbs_lower_request() {
        assert_eq!(
            resolve("2.0.0-rc.1", recommended(ReleaseType::Patch), Some("rc")).unwrap(),
            "2.0.0-rc.2"
        );
    }
}
