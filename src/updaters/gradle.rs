use super::{compile, VersionUpdater};
use crate::error::{BumpError, Result};

const VERSION_LINE: &str = r#"(?m)^version\s*=\s*["']([^"'\r\n]*)["']"#;

/// Gradle build scripts (`build.gradle`, `build.gradle.kts`)
///
/// Matches a top-level `version = "x.y.z"` assignment with either quote style.
pub struct GradleUpdater;

impl VersionUpdater for GradleUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let regex = compile(VERSION_LINE)?;
        regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| BumpError::field_not_found("build.gradle"))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let regex = compile(VERSION_LINE)?;
        let span = regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| BumpError::field_not_found("build.gradle"))?;

        Ok(format!(
            "{}{}{}",
            &contents[..span.start()],
            version,
            &contents[span.end()..]
        ))
    }
}
