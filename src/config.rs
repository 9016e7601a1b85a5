use crate::error::{BumpError, Result};
use crate::hooks::HookType;
use crate::updaters::{FileSpec, JSON_BUMP_FILES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for, nearest directory first
pub const CONFIG_FILE_NAMES: &[&str] = &["gitbump.toml", ".versionrc", ".versionrc.json"];

/// Manifests the current version is read from, in priority order
pub const DEFAULT_PACKAGE_FILES: &[&str] = &["package.json", "bower.json", "manifest.json"];

pub const DEFAULT_HEADER: &str =
    "# Changelog\n\nAll notable changes to this project will be documented in this file. See [conventional commits](https://conventionalcommits.org) for commit guidelines.\n";

/// Represents the complete configuration for git-bump.
///
/// TOML files use snake_case keys; `.versionrc` JSON files may use the
/// camelCase spelling of the same keys.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_package_files", alias = "packageFiles")]
    pub package_files: Vec<FileEntry>,

    #[serde(default = "default_bump_files", alias = "bumpFiles")]
    pub bump_files: Vec<FileEntry>,

    /// `major`, `minor`, `patch` or an exact version
    #[serde(default, alias = "releaseAs")]
    pub release_as: Option<String>,

    /// Prerelease identifier; `true` starts an unnamed prerelease line
    #[serde(default)]
    pub prerelease: Option<PrereleaseSetting>,

    #[serde(default = "default_tag_prefix", alias = "tagPrefix")]
    pub tag_prefix: String,

    #[serde(default, alias = "firstRelease")]
    pub first_release: bool,

    #[serde(default)]
    pub skip: SkipConfig,

    #[serde(default, alias = "dryRun")]
    pub dry_run: bool,

    #[serde(default)]
    pub silent: bool,

    #[serde(default, alias = "commitAll")]
    pub commit_all: bool,

    #[serde(default, alias = "tagForce")]
    pub tag_force: bool,

    /// Fall back to the latest git tag when no package file holds a version
    #[serde(default = "default_true", alias = "gitTagFallback")]
    pub git_tag_fallback: bool,

    #[serde(default = "default_infile")]
    pub infile: PathBuf,

    #[serde(default = "default_header")]
    pub header: String,

    #[serde(
        default = "default_release_commit_message_format",
        alias = "releaseCommitMessageFormat"
    )]
    pub release_commit_message_format: String,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default, alias = "conventionalCommits")]
    pub conventional_commits: ConventionalCommitsConfig,
}

/// A package or bump file in configuration: a bare path or a descriptor
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FileEntry {
    Path(String),
    Descriptor {
        filename: String,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updater: Option<String>,
    },
}

impl FileEntry {
    pub fn filename(&self) -> &str {
        match self {
            FileEntry::Path(filename) | FileEntry::Descriptor { filename, .. } => filename,
        }
    }

    /// Convert to the registry's file descriptor
    pub fn to_spec(&self) -> FileSpec {
        match self {
            FileEntry::Path(filename) => FileSpec::new(filename.clone()),
            FileEntry::Descriptor {
                filename,
                kind,
                updater,
            } => {
                let mut spec = match updater {
                    Some(reference) => FileSpec::with_updater_ref(filename.clone(), reference.clone()),
                    None => FileSpec::new(filename.clone()),
                };
                spec.kind = kind.clone();
                spec
            }
        }
    }
}

impl From<&str> for FileEntry {
    fn from(filename: &str) -> Self {
        FileEntry::Path(filename.to_string())
    }
}

/// `prerelease = "beta"` or `prerelease = true`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PrereleaseSetting {
    Flag(bool),
    Identifier(String),
}

impl PrereleaseSetting {
    /// The requested identifier; an empty string for a bare prerelease, `None` when disabled
    pub fn identifier(&self) -> Option<String> {
        match self {
            PrereleaseSetting::Flag(true) => Some(String::new()),
            PrereleaseSetting::Flag(false) => None,
            PrereleaseSetting::Identifier(id) => Some(id.clone()),
        }
    }
}

/// Steps of the release workflow that can be turned off
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipConfig {
    #[serde(default)]
    pub bump: bool,
    #[serde(default)]
    pub changelog: bool,
    #[serde(default)]
    pub commit: bool,
    #[serde(default)]
    pub tag: bool,
}

/// Shell commands run around each workflow step
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct ScriptsConfig {
    pub prerelease: Option<String>,
    pub prebump: Option<String>,
    pub postbump: Option<String>,
    pub prechangelog: Option<String>,
    pub postchangelog: Option<String>,
    pub precommit: Option<String>,
    pub postcommit: Option<String>,
    pub pretag: Option<String>,
    pub posttag: Option<String>,
}

impl ScriptsConfig {
    pub fn get(&self, hook: HookType) -> Option<&str> {
        let script = match hook {
            HookType::PreRelease => &self.prerelease,
            HookType::PreBump => &self.prebump,
            HookType::PostBump => &self.postbump,
            HookType::PreChangelog => &self.prechangelog,
            HookType::PostChangelog => &self.postchangelog,
            HookType::PreCommit => &self.precommit,
            HookType::PostCommit => &self.postcommit,
            HookType::PreTag => &self.pretag,
            HookType::PostTag => &self.posttag,
        };
        script.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Returns the default list of footers marking a breaking change.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Returns the commit types that warrant a minor release.
fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Configuration for conventional commit analysis.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            minor_types: default_minor_types(),
        }
    }
}

fn default_package_files() -> Vec<FileEntry> {
    DEFAULT_PACKAGE_FILES.iter().map(|f| FileEntry::from(*f)).collect()
}

fn default_bump_files() -> Vec<FileEntry> {
    JSON_BUMP_FILES.iter().map(|f| FileEntry::from(*f)).collect()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_true() -> bool {
    true
}

fn default_infile() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_release_commit_message_format() -> String {
    "chore(release): {{currentTag}}".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            package_files: default_package_files(),
            bump_files: default_bump_files(),
            release_as: None,
            prerelease: None,
            tag_prefix: default_tag_prefix(),
            first_release: false,
            skip: SkipConfig::default(),
            dry_run: false,
            silent: false,
            commit_all: false,
            tag_force: false,
            git_tag_fallback: true,
            infile: default_infile(),
            header: default_header(),
            release_commit_message_format: default_release_commit_message_format(),
            scripts: ScriptsConfig::default(),
            conventional_commits: ConventionalCommitsConfig::default(),
        }
    }
}

impl Config {
    /// Package files in priority order
    pub fn package_specs(&self) -> Vec<FileSpec> {
        self.package_files.iter().map(FileEntry::to_spec).collect()
    }

    /// Bump files, followed by any package file not already listed
    pub fn bump_specs(&self) -> Vec<FileSpec> {
        let mut entries: Vec<&FileEntry> = self.bump_files.iter().collect();
        for package in &self.package_files {
            if !entries.iter().any(|e| e.filename() == package.filename()) {
                entries.push(package);
            }
        }
        entries.into_iter().map(FileEntry::to_spec).collect()
    }

    /// The requested prerelease identifier, if any
    pub fn prerelease_identifier(&self) -> Option<String> {
        self.prerelease.as_ref().and_then(PrereleaseSetting::identifier)
    }

    /// Commit message with `{{currentTag}}` substituted
    pub fn release_commit_message(&self, tag: &str) -> String {
        self.release_commit_message_format
            .replace("{{currentTag}}", tag)
    }
}

/// Search `start` and its ancestors for a config file.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Parse a config file, TOML or JSON depending on its name.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BumpError::config(format!("Cannot read {}: {}", path.display(), e)))?;

    let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
    let parsed = if is_toml {
        toml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|e| BumpError::config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitbump.toml`, `.versionrc` or `.versionrc.json` in `start` or the nearest ancestor
/// 3. `gitbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `start` - Directory the upward search begins in
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, start: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if let Some(found) = find_config(start) {
        Some(found)
    } else {
        dirs::config_dir()
            .map(|dir| dir.join("gitbump.toml"))
            .filter(|candidate| candidate.is_file())
    };

    match path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading configuration");
            parse_config_file(&path)
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tag_prefix, "v");
        assert_eq!(config.infile, PathBuf::from("CHANGELOG.md"));
        assert!(config.git_tag_fallback);
        assert_eq!(config.package_files.len(), 3);
        assert_eq!(config.bump_files.len(), 5);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tag_prefix, "v");
        assert!(config.git_tag_fallback);
        assert_eq!(
            config.release_commit_message_format,
            "chore(release): {{currentTag}}"
        );
    }

    #[test]
    fn test_file_entries_accept_paths_and_descriptors() {
        let config: Config = toml::from_str(
            r#"
bump_files = [
  "package.json",
  { filename = "VERSION_TRACKER.txt", type = "plain-text" },
  { filename = "mix.exs", updater = "scripts/mix-updater.sh" },
]
"#,
        )
        .unwrap();

        assert_eq!(config.bump_files[0], FileEntry::Path("package.json".into()));
        let spec = config.bump_files[1].to_spec();
        assert_eq!(spec.kind.as_deref(), Some("plain-text"));
        let spec = config.bump_files[2].to_spec();
        assert!(spec.updater.is_some());
    }

    #[test]
    fn test_versionrc_camel_case() {
        let config: Config = serde_json::from_str(
            r#"{
  "packageFiles": [{ "filename": "VERSION.txt", "type": "plain-text" }],
  "bumpFiles": ["package.json"],
  "tagPrefix": "release-",
  "prerelease": true,
  "skip": { "changelog": true }
}"#,
        )
        .unwrap();

        assert_eq!(config.tag_prefix, "release-");
        assert_eq!(config.prerelease_identifier(), Some(String::new()));
        assert!(config.skip.changelog);
        assert!(!config.skip.tag);
    }

    #[test]
    fn test_bump_specs_include_package_files() {
        let config = Config {
            package_files: vec!["VERSION.txt".into(), "package.json".into()],
            bump_files: vec!["package.json".into(), "pom.xml".into()],
            ..Config::default()
        };

        let names: Vec<String> = config.bump_specs().into_iter().map(|s| s.filename).collect();
        assert_eq!(names, vec!["package.json", "pom.xml", "VERSION.txt"]);
    }

    #[test]
    fn test_prerelease_setting() {
        assert_eq!(PrereleaseSetting::Flag(false).identifier(), None);
        assert_eq!(
            PrereleaseSetting::Identifier("beta".into()).identifier(),
            Some("beta".to_string())
        );
    }

    #[test]
    fn test_release_commit_message() {
        let config = Config::default();
        assert_eq!(
            config.release_commit_message("v1.2.0"),
            "chore(release): v1.2.0"
        );
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages/app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(".versionrc"), r#"{"tagPrefix": ""}"#).unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(".versionrc"));

        let config = load_config(None, &nested).unwrap();
        assert_eq!(config.tag_prefix, "");
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitbump.toml");
        fs::write(&path, "tag_prefix = [").unwrap();

        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(err.to_string().contains("gitbump.toml"));
    }

    #[test]
    fn test_scripts_lookup() {
        let scripts = ScriptsConfig {
            prebump: Some("echo 2.0.0".to_string()),
            posttag: Some("  ".to_string()),
            ..ScriptsConfig::default()
        };
        assert_eq!(scripts.get(HookType::PreBump), Some("echo 2.0.0"));
        assert_eq!(scripts.get(HookType::PostTag), None);
        assert_eq!(scripts.get(HookType::PreTag), None);
    }
}
