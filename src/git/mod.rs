//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, allowing for a real repository and a mock implementation
//! for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [VersionControl] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! Most code should depend on the [VersionControl] trait rather than concrete
//! implementations to enable easy testing and flexibility.
//!
//! ```rust
//! # use git_bump::git::{latest_semver_tag, VersionControl};
//! # fn example<R: VersionControl>(repo: &R) -> git_bump::Result<()> {
//! let tags = repo.tag_names()?;
//! let latest = latest_semver_tag(&tags, "v", None);
//! let commits = repo.commits_since(latest.as_ref().map(|t| t.name.as_str()))?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use semver::Version;
use std::path::{Path, PathBuf};

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The commit hash
    pub hash: String,
    /// The full commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// A tag that parses as a semantic version once its prefix is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverTag {
    /// Full tag name, prefix included
    pub name: String,
    pub version: Version,
}

/// Git operations used by the release workflow
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]; `git2::Error` converts into
/// [crate::error::BumpError::Git].
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation recording the calls it receives
pub trait VersionControl {
    /// All tag names in the repository
    fn tag_names(&self) -> Result<Vec<String>>;

    /// Commits reachable from HEAD but not from `tag`, oldest first.
    ///
    /// With `tag = None` the whole history is returned. An unborn HEAD yields
    /// no commits.
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Hash of the HEAD commit, `None` on an unborn branch
    fn head_hash(&self) -> Result<Option<String>>;

    /// Whether `path` (relative to the working directory root) is ignored by git
    fn is_path_ignored(&self, path: &Path) -> Result<bool>;

    /// Stage `paths` (or every tracked change when `all` is set) and commit.
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the new commit
    fn commit(&self, paths: &[PathBuf], all: bool, message: &str) -> Result<String>;

    /// Create an annotated tag on HEAD, replacing an existing one when `force` is set
    fn create_tag(&self, name: &str, message: &str, force: bool) -> Result<()>;
}

/// Pick the highest semver tag carrying `prefix`.
///
/// When `prerelease` names an identifier, prerelease tags of other lines are
/// ignored (`v1.1.0-beta.0` does not count while releasing `alpha`). Tags
/// that do not parse as versions are skipped.
pub fn latest_semver_tag(tags: &[String], prefix: &str, prerelease: Option<&str>) -> Option<SemverTag> {
    let wanted = prerelease.filter(|id| !id.is_empty());

    tags.iter()
        .filter_map(|name| {
            let stripped = name.strip_prefix(prefix)?;
            let cleaned = stripped.trim().trim_start_matches(['v', '=']);
            let version = Version::parse(cleaned).ok()?;
            Some(SemverTag {
                name: name.clone(),
                version,
            })
        })
        .filter(|tag| match wanted {
            Some(id) if !tag.version.pre.is_empty() => {
                tag.version.pre.as_str().split('.').next() == Some(id)
            }
            _ => true,
        })
        .max_by(|a, b| a.version.cmp_precedence(&b.version))
}
