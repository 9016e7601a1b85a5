use std::fmt;

/// Non-fatal problems met while reading or bumping files.
/// These are reported to the user but do not stop the release.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No updater could be resolved for a configured file
    UnresolvedFile { file: String, reason: String },
    /// The file exists but its version could not be read or written
    UnreadableFile { file: String, reason: String },
    /// No package file holds a version; the latest git tag was used instead
    VersionFromTag { version: String },
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnresolvedFile { file, reason } => {
                write!(f, "Skipping '{}': {}", file, reason)
            }
            BoundaryWarning::UnreadableFile { file, reason } => {
                write!(f, "Not updating '{}': {}", file, reason)
            }
            BoundaryWarning::VersionFromTag { version } => {
                write!(
                    f,
                    "No version found in package files, using version {} from git tags",
                    version
                )
            }
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
        }
    }
}
