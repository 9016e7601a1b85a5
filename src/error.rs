use thiserror::Error;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error(
        "releaseAs must be one of 'major', 'minor' or 'patch', or a valid semver version (got '{0}')"
    )]
    InvalidReleaseType(String),

    #[error(
        "releaseAs and prerelease have conflicting prerelease identifiers ('{release_as}' vs '{prerelease}')"
    )]
    ConflictingPrerelease {
        release_as: String,
        prerelease: String,
    },

    #[error("Invalid updater '{0}': expected a registered updater name or a path to an executable")]
    InvalidUpdater(String),

    #[error("Unable to locate updater for provided type ({0})")]
    UnknownUpdaterType(String),

    #[error(
        "Unsupported file ({0}) provided for bumping. Please specify the updater `type` or use a custom `updater`"
    )]
    UnsupportedFile(String),

    #[error("Failed to read the version field in your {0} file - is it present?")]
    VersionFieldNotFound(String),

    #[error("Invalid version '{value}': {source}")]
    InvalidVersion {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Custom updater failed: {0}")]
    CustomUpdater(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        BumpError::Hook(msg.into())
    }

    /// Create an XML error with context
    pub fn xml(msg: impl Into<String>) -> Self {
        BumpError::Xml(msg.into())
    }

    /// Create a custom updater error with context
    pub fn custom_updater(msg: impl Into<String>) -> Self {
        BumpError::CustomUpdater(msg.into())
    }

    /// Version field missing from a file of the given format
    pub fn field_not_found(format: impl Into<String>) -> Self {
        BumpError::VersionFieldNotFound(format.into())
    }

    /// Parse a strict semver string, mapping failures to [BumpError::InvalidVersion]
    pub fn parse_version(value: &str) -> Result<semver::Version> {
        semver::Version::parse(value.trim()).map_err(|source| BumpError::InvalidVersion {
            value: value.to_string(),
            source,
        })
    }

    /// True for `ENOENT`-class failures, which callers skip instead of reporting
    pub fn is_not_found(&self) -> bool {
        matches!(self, BumpError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// True for errors raised while resolving an updater rather than reading content
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            BumpError::UnsupportedFile(_)
                | BumpError::UnknownUpdaterType(_)
                | BumpError::InvalidUpdater(_)
        )
    }
}
