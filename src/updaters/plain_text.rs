use super::VersionUpdater;
use crate::error::Result;

/// A file whose whole content is the version
pub struct PlainTextUpdater;

impl VersionUpdater for PlainTextUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        Ok(contents.trim().to_string())
    }

    fn write_version(&self, _contents: &str, version: &str) -> Result<String> {
        Ok(version.to_string())
    }
}
