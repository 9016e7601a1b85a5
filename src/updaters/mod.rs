//! Version file updaters
//!
//! Every supported file format gets a [VersionUpdater]: a pair of pure
//! functions over whole-file text that read the stored version and write a
//! new one while leaving everything else alone.
//!
//! # Overview
//!
//! The built-in updaters are stateless singletons selected through
//! [UpdaterKind]. Custom updaters are either registered in-process on the
//! [UpdaterRegistry] or point at an external program ([command::CommandUpdater]).
//!
//! Resolution order for one [FileSpec]:
//!
//! 1. an updater object attached to the [FileSpec]
//! 2. a custom `updater` reference (registered name or program path)
//! 3. an explicit `type`
//! 4. the filename
//!
//! ```rust
//! # use git_bump::updaters::{FileSpec, UpdaterRegistry, VersionUpdater};
//! # fn example() -> git_bump::Result<()> {
//! let registry = UpdaterRegistry::new(".");
//! let resolved = registry.resolve(&FileSpec::new("package.json"))?;
//! let bumped = resolved.updater.write_version("{\"version\": \"1.0.0\"}", "1.1.0")?;
//! assert_eq!(resolved.updater.read_version(&bumped)?, "1.1.0");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod csproj;
pub mod gradle;
pub mod json;
pub mod maven;
pub mod newline;
pub mod plain_text;
pub mod python;
pub mod yaml;

pub use command::CommandUpdater;

use crate::error::{BumpError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// JSON manifests recognised by basename
pub const JSON_BUMP_FILES: &[&str] = &[
    "package.json",
    "bower.json",
    "manifest.json",
    "package-lock.json",
    "npm-shrinkwrap.json",
];

/// Plain-text version files recognised by name
pub const PLAIN_TEXT_BUMP_FILES: &[&str] = &["VERSION.txt", "version.txt"];

/// Reads and writes the version stored in a file's text.
///
/// Implementations must be pure: no I/O visible to the caller and no state
/// carried between calls. `write_version` must round-trip through
/// `read_version` and must not touch content unrelated to the version.
pub trait VersionUpdater: Send + Sync {
    /// Extract the stored version from `contents`
    fn read_version(&self, contents: &str) -> Result<String>;

    /// Return `contents` with the stored version replaced by `version`
    fn write_version(&self, contents: &str, version: &str) -> Result<String>;
}

/// Built-in updater formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdaterKind {
    Json,
    PlainText,
    Maven,
    Gradle,
    Csproj,
    Yaml,
    Openapi,
    Python,
}

impl UpdaterKind {
    pub const ALL: [UpdaterKind; 8] = [
        UpdaterKind::Json,
        UpdaterKind::PlainText,
        UpdaterKind::Maven,
        UpdaterKind::Gradle,
        UpdaterKind::Csproj,
        UpdaterKind::Yaml,
        UpdaterKind::Openapi,
        UpdaterKind::Python,
    ];

    /// Name used for the `type` field in configuration
    pub fn name(self) -> &'static str {
        match self {
            UpdaterKind::Json => "json",
            UpdaterKind::PlainText => "plain-text",
            UpdaterKind::Maven => "maven",
            UpdaterKind::Gradle => "gradle",
            UpdaterKind::Csproj => "csproj",
            UpdaterKind::Yaml => "yaml",
            UpdaterKind::Openapi => "openapi",
            UpdaterKind::Python => "python",
        }
    }

    /// The process-wide singleton implementing this format
    pub fn updater(self) -> &'static dyn VersionUpdater {
        match self {
            UpdaterKind::Json => &json::JsonUpdater,
            UpdaterKind::PlainText => &plain_text::PlainTextUpdater,
            UpdaterKind::Maven => &maven::MavenUpdater,
            UpdaterKind::Gradle => &gradle::GradleUpdater,
            UpdaterKind::Csproj => &csproj::CsprojUpdater,
            UpdaterKind::Yaml => &yaml::YamlUpdater,
            UpdaterKind::Openapi => &yaml::OpenApiUpdater,
            UpdaterKind::Python => &python::PythonUpdater,
        }
    }
}

impl FromStr for UpdaterKind {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        UpdaterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BumpError::UnknownUpdaterType(s.to_string()))
    }
}

impl fmt::Display for UpdaterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to a custom updater
#[derive(Clone)]
pub enum UpdaterRef {
    /// Registered name, or a program path relative to the project root
    Named(String),
    /// Updater object supplied directly
    Inline(Arc<dyn VersionUpdater>),
}

impl fmt::Debug for UpdaterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdaterRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            UpdaterRef::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

/// One target file to read or bump
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub filename: String,
    /// Explicit format name (`json`, `maven`, ...)
    pub kind: Option<String>,
    pub updater: Option<UpdaterRef>,
}

impl FileSpec {
    /// A file whose format is inferred from its name
    pub fn new(filename: impl Into<String>) -> Self {
        FileSpec {
            filename: filename.into(),
            kind: None,
            updater: None,
        }
    }

    /// A file with an explicit format
    pub fn with_kind(filename: impl Into<String>, kind: impl Into<String>) -> Self {
        FileSpec {
            kind: Some(kind.into()),
            ..FileSpec::new(filename)
        }
    }

    /// A file handled by a custom updater object
    pub fn with_updater(filename: impl Into<String>, updater: Arc<dyn VersionUpdater>) -> Self {
        FileSpec {
            updater: Some(UpdaterRef::Inline(updater)),
            ..FileSpec::new(filename)
        }
    }

    /// A file handled by a registered or external updater
    pub fn with_updater_ref(filename: impl Into<String>, reference: impl Into<String>) -> Self {
        FileSpec {
            updater: Some(UpdaterRef::Named(reference.into())),
            ..FileSpec::new(filename)
        }
    }
}

/// An updater bound to a built-in format or a custom implementation
#[derive(Clone)]
pub enum Updater {
    BuiltIn(UpdaterKind),
    Custom(Arc<dyn VersionUpdater>),
}

impl Updater {
    /// Format name for log output
    pub fn describe(&self) -> String {
        match self {
            Updater::BuiltIn(kind) => kind.name().to_string(),
            Updater::Custom(_) => "custom".to_string(),
        }
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::BuiltIn(kind) => f.debug_tuple("BuiltIn").field(kind).finish(),
            Updater::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl VersionUpdater for Updater {
    fn read_version(&self, contents: &str) -> Result<String> {
        match self {
            Updater::BuiltIn(kind) => kind.updater().read_version(contents),
            Updater::Custom(custom) => custom.read_version(contents),
        }
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        match self {
            Updater::BuiltIn(kind) => kind.updater().write_version(contents, version),
            Updater::Custom(custom) => custom.write_version(contents, version),
        }
    }
}

/// A [FileSpec] with its updater resolved
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub filename: String,
    pub updater: Updater,
}

/// Maps file references to updaters
pub struct UpdaterRegistry {
    root: PathBuf,
    custom: HashMap<String, Arc<dyn VersionUpdater>>,
}

impl UpdaterRegistry {
    /// Create a registry resolving relative paths against `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        UpdaterRegistry {
            root: root.as_ref().to_path_buf(),
            custom: HashMap::new(),
        }
    }

    /// Register a named custom updater, referenced from configuration via `updater = "<name>"`
    pub fn register(&mut self, name: impl Into<String>, updater: Arc<dyn VersionUpdater>) {
        self.custom.insert(name.into(), updater);
    }

    /// Resolve the updater for one file.
    ///
    /// # Returns
    /// * `Ok(ResolvedFile)` - The file bound to its updater
    /// * `Err(InvalidUpdater)` - Custom reference is neither registered nor an existing program
    /// * `Err(UnknownUpdaterType)` - Explicit `type` is not a built-in format
    /// * `Err(UnsupportedFile)` - Nothing given and the filename matches no format
    pub fn resolve(&self, spec: &FileSpec) -> Result<ResolvedFile> {
        let updater = match (&spec.updater, &spec.kind) {
            (Some(UpdaterRef::Inline(custom)), _) => Updater::Custom(Arc::clone(custom)),
            (Some(UpdaterRef::Named(reference)), _) => self.custom_updater(reference)?,
            (None, Some(kind)) => Updater::BuiltIn(kind.parse()?),
            (None, None) => Updater::BuiltIn(infer_kind(&spec.filename)?),
        };

        tracing::debug!(
            file = %spec.filename,
            updater = %updater.describe(),
            "resolved updater"
        );

        Ok(ResolvedFile {
            filename: spec.filename.clone(),
            updater,
        })
    }

    fn custom_updater(&self, reference: &str) -> Result<Updater> {
        if let Some(custom) = self.custom.get(reference) {
            return Ok(Updater::Custom(Arc::clone(custom)));
        }

        let program = self.root.join(reference);
        if program.is_file() {
            return Ok(Updater::Custom(Arc::new(CommandUpdater::new(program))));
        }

        Err(BumpError::InvalidUpdater(reference.to_string()))
    }
}

/// Infer the built-in format from a filename
pub fn infer_kind(filename: &str) -> Result<UpdaterKind> {
    let basename = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename);

    let kind = if JSON_BUMP_FILES.contains(&basename) {
        UpdaterKind::Json
    } else if PLAIN_TEXT_BUMP_FILES.contains(&filename) {
        UpdaterKind::PlainText
    } else if filename.contains("pom.xml") {
        UpdaterKind::Maven
    } else if filename.contains("build.gradle") {
        UpdaterKind::Gradle
    } else if filename.ends_with(".csproj") {
        UpdaterKind::Csproj
    } else if filename.contains("openapi.yaml") || filename.contains("openapi.yml") {
        UpdaterKind::Openapi
    } else if filename.ends_with(".yaml") || filename.ends_with(".yml") {
        UpdaterKind::Yaml
    } else {
        return Err(BumpError::UnsupportedFile(filename.to_string()));
    };

    Ok(kind)
}

/// Compile a regex used by the line-based updaters
pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| BumpError::config(format!("Regex error: {}", e)))
}
