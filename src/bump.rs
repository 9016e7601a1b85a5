//! Reading the current version and rewriting it across the bump files
//!
//! Both entry points run every updater as a pure function over the file
//! contents. [update_files] resolves and prepares every new file body before
//! the first write, so a fatal error leaves the working tree untouched.

use crate::boundary::BoundaryWarning;
use crate::error::{BumpError, Result};
use crate::git::VersionControl;
use crate::updaters::{FileSpec, ResolvedFile, UpdaterRegistry, VersionUpdater};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The version held by the primary manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentVersion {
    pub version: String,
    /// The package file it was read from
    pub file: String,
}

/// Outcome of [read_current_version]
#[derive(Debug, Clone, Default)]
pub struct VersionLookup {
    pub current: Option<CurrentVersion>,
    pub warnings: Vec<BoundaryWarning>,
}

/// One rewritten version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub from: String,
    pub to: String,
}

/// Result of bumping the version across files
#[derive(Debug, Clone, Default)]
pub struct BumpResult {
    /// The version written
    pub version: String,
    /// Every file written (or that would be written in a dry run), once each
    pub updated_files: Vec<PathBuf>,
    pub changes: Vec<FileChange>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Options for [update_files]
#[derive(Default)]
pub struct UpdateOptions<'a> {
    /// Compute and report changes without writing
    pub dry_run: bool,
    /// Filename of the primary manifest; its failures are fatal
    pub primary: Option<&'a str>,
    /// Used to skip files ignored by git
    pub vcs: Option<&'a dyn VersionControl>,
}

/// Read the current version from the first usable package file.
///
/// Package files are tried in order; the first one that resolves, exists and
/// yields a version wins. Missing files are skipped silently; other failures
/// become warnings.
///
/// # Returns
/// * `Ok(VersionLookup)` - The version, if any package file holds one, and warnings
/// * `Err` - No package file yielded a version and the first configured one
///   exists but could not be resolved or read
pub fn read_current_version(
    root: &Path,
    package_files: &[FileSpec],
    registry: &UpdaterRegistry,
) -> Result<VersionLookup> {
    let mut lookup = VersionLookup::default();
    let mut primary_failure: Option<BumpError> = None;

    for (index, spec) in package_files.iter().enumerate() {
        let path = root.join(&spec.filename);

        let outcome = registry
            .resolve(spec)
            .and_then(|resolved| read_file(&path).map(|contents| (resolved, contents)))
            .and_then(|(resolved, contents)| resolved.updater.read_version(&contents));

        match outcome {
            Ok(version) => {
                tracing::debug!(file = %spec.filename, %version, "read current version");
                lookup.current = Some(CurrentVersion {
                    version,
                    file: spec.filename.clone(),
                });
                return Ok(lookup);
            }
            Err(e) if e.is_not_found() || (e.is_resolution() && !path.exists()) => {
                tracing::debug!(file = %spec.filename, "package file not found, skipping");
            }
            Err(e) => {
                lookup.warnings.push(skip_warning(&spec.filename, &e));
                if index == 0 {
                    primary_failure = Some(e);
                }
            }
        }
    }

    match primary_failure {
        Some(e) => Err(e),
        None => Ok(lookup),
    }
}

/// Write `version` into every bump file.
///
/// For each file in order: resolve its updater, skip it when ignored by git,
/// missing or not a regular file, then read, rewrite and verify the version.
/// Failures on secondary files become warnings; failures on the primary
/// manifest are fatal. Files are written only after every file was prepared.
pub fn update_files(
    root: &Path,
    bump_files: &[FileSpec],
    version: &str,
    options: &UpdateOptions<'_>,
    registry: &UpdaterRegistry,
) -> Result<BumpResult> {
    let mut result = BumpResult {
        version: version.to_string(),
        ..BumpResult::default()
    };

    let mut resolved: Vec<ResolvedFile> = Vec::with_capacity(bump_files.len());
    for spec in bump_files {
        match registry.resolve(spec) {
            Ok(file) => resolved.push(file),
            Err(e) if is_primary(options, &spec.filename) => return Err(e),
            Err(e) => result.warnings.push(skip_warning(&spec.filename, &e)),
        }
    }

    let mut planned: Vec<(PathBuf, String)> = Vec::new();
    for file in &resolved {
        let path = root.join(&file.filename);
        if result.updated_files.contains(&path) {
            continue;
        }

        if let Some(vcs) = options.vcs {
            match vcs.is_path_ignored(&path) {
                Ok(true) => {
                    tracing::debug!(file = %file.filename, "not updating file, it is ignored in git");
                    continue;
                }
                Ok(false) => {}
                Err(e) => tracing::debug!(file = %file.filename, error = %e, "ignore check failed"),
            }
        }

        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                tracing::debug!(file = %file.filename, "not updating file, it is not a regular file");
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(file = %file.filename, "bump file not found, skipping");
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        match prepare(&path, file, version) {
            Ok((contents, change)) => {
                result.updated_files.push(path.clone());
                result.changes.push(change);
                planned.push((path, contents));
            }
            Err(e) if is_primary(options, &file.filename) => return Err(e),
            Err(e) => result.warnings.push(skip_warning(&file.filename, &e)),
        }
    }

    for change in &result.changes {
        tracing::info!(
            file = %change.path.display(),
            from = %change.from,
            to = %change.to,
            "bumping version"
        );
    }

    if options.dry_run {
        return Ok(result);
    }

    for (path, contents) in planned {
        fs::write(&path, contents)?;
    }

    Ok(result)
}

/// New contents of one file, with the version change it makes
fn prepare(path: &Path, file: &ResolvedFile, version: &str) -> Result<(String, FileChange)> {
    let contents = read_file(path)?;
    let from = file.updater.read_version(&contents)?;
    let updated = file.updater.write_version(&contents, version)?;
    let to = file.updater.read_version(&updated)?;

    Ok((
        updated,
        FileChange {
            path: path.to_path_buf(),
            from,
            to,
        },
    ))
}

fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

fn is_primary(options: &UpdateOptions<'_>, filename: &str) -> bool {
    options
        .primary
        .is_some_and(|primary| Path::new(primary) == Path::new(filename))
}

fn skip_warning(file: &str, error: &BumpError) -> BoundaryWarning {
    if error.is_resolution() {
        BoundaryWarning::UnresolvedFile {
            file: file.to_string(),
            reason: error.to_string(),
        }
    } else {
        BoundaryWarning::UnreadableFile {
            file: file.to_string(),
            reason: error.to_string(),
        }
    }
}
