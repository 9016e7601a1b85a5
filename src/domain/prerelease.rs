//! Prerelease line handling for semantic versioning
//!
//! A prerelease line is a run of versions sharing one identifier and one
//! `major.minor.patch` target, told apart by a trailing counter
//! (`1.1.0-dev.0`, `1.1.0-dev.1`, ...). See https://semver.org/#spec-item-9

use crate::domain::version::ReleaseType;
use crate::error::{BumpError, Result};
use semver::{Prerelease, Version};

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Advance a prerelease segment.
///
/// The right-most numeric component is incremented (or `0` appended when
/// there is none). When `identifier` names a different line, or the line has
/// no counter yet, the result restarts at `{identifier}.0`.
///
/// # Examples
/// ```ignore
/// next_prerelease("alpha.0", Some("alpha")) == "alpha.1"
/// next_prerelease("alpha.3", Some("beta"))  == "beta.0"
/// next_prerelease("",        Some("rc"))    == "rc.0"
/// next_prerelease("",        None)          == "0"
/// ```
pub fn next_prerelease(current: &Prerelease, identifier: Option<&str>) -> Result<Prerelease> {
    let mut parts: Vec<String> = if current.is_empty() {
        vec!["0".to_string()]
    } else {
        let mut parts: Vec<String> = current.as_str().split('.').map(str::to_string).collect();
        match parts.iter().rposition(|p| is_numeric(p)) {
            Some(i) => {
                let bumped = parts[i].parse::<u64>().unwrap_or(0).saturating_add(1);
                parts[i] = bumped.to_string();
            }
            None => parts.push("0".to_string()),
        }
        parts
    };

    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        let continues_line = parts[0] == id && parts.get(1).is_some_and(|p| is_numeric(p));
        if !continues_line {
            parts = vec![id.to_string(), "0".to_string()];
        }
    }

    let joined = parts.join(".");
    Prerelease::new(&joined).map_err(|source| BumpError::InvalidVersion {
        value: joined,
        source,
    })
}

/// The identifier family of a prerelease, i.e. everything but a trailing counter.
///
/// `amazing.2` -> `amazing`, `beta.rc.1` -> `beta.rc`, `amazing` -> `amazing`
pub fn identifier_family(pre: &Prerelease) -> String {
    let parts: Vec<&str> = pre.as_str().split('.').collect();
    match parts.split_last() {
        Some((last, rest)) if is_numeric(last) => rest.join("."),
        _ => pre.as_str().to_string(),
    }
}

/// The component a prerelease version is heading towards.
///
/// `1.0.1-dev.0` is a patch prerelease, `1.1.0-dev.0` a minor one and
/// `2.0.0-rc.0` a major one. Returns `None` for releases and for `0.0.0-*`.
pub fn active_type(version: &Version) -> Option<ReleaseType> {
    if version.pre.is_empty() {
        return None;
    }
    if version.patch != 0 {
        Some(ReleaseType::Patch)
    } else if version.minor != 0 {
        Some(ReleaseType::Minor)
    } else if version.major != 0 {
        Some(ReleaseType::Major)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre(s: &str) -> Prerelease {
        Prerelease::new(s).unwrap()
    }

    fn next(s: &str, id: Option<&str>) -> String {
        next_prerelease(&pre(s), id).unwrap().to_string()
    }

    #[test]
    fn test_next_prerelease_continues_line() {
        assert_eq!(next("alpha.0", Some("alpha")), "alpha.1");
        assert_eq!(next("rc.99", Some("rc")), "rc.100");
    }

    #[test]
    fn test_next_prerelease_switches_identifier() {
        assert_eq!(next("alpha.3", Some("beta")), "beta.0");
    }

    #[test]
    fn test_next_prerelease_from_empty() {
        assert_eq!(next("", Some("dev")), "dev.0");
        assert_eq!(next("", None), "0");
        assert_eq!(next("", Some("")), "0");
    }

    #[test]
    fn test_next_prerelease_without_counter() {
        assert_eq!(next("alpha", Some("alpha")), "alpha.0");
        assert_eq!(next("alpha", None), "alpha.0");
    }

    #[test]
    fn test_next_prerelease_bumps_rightmost_number() {
        assert_eq!(next("beta.1.rc", None), "beta.2.rc");
    }

    #[test]
    fn test_identifier_family() {
        assert_eq!(identifier_family(&pre("amazing.2")), "amazing");
        assert_eq!(identifier_family(&pre("beta.rc.1")), "beta.rc");
        assert_eq!(identifier_family(&pre("amazing")), "amazing");
    }

    #[test]
    fn test_active_type() {
        let v = |s: &str| Version::parse(s).unwrap();
        assert_eq!(active_type(&v("1.0.1-dev.0")), Some(ReleaseType::Patch));
        assert_eq!(active_type(&v("1.1.0-dev.0")), Some(ReleaseType::Minor));
        assert_eq!(active_type(&v("2.0.0-rc.0")), Some(ReleaseType::Major));
        assert_eq!(active_type(&v("2.0.0")), None);
        assert_eq!(active_type(&v("0.0.0-x")), None);
    }
}
