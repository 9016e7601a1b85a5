use super::{compile, VersionUpdater};
use crate::error::{BumpError, Result};

const VERSION_ELEMENT: &str = r"<Version>([^<]*)</Version>";

/// .NET project files, `<Version>` inside a property group
pub struct CsprojUpdater;

impl VersionUpdater for CsprojUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let regex = compile(VERSION_ELEMENT)?;
        regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .ok_or_else(|| BumpError::field_not_found("csproj"))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let regex = compile(VERSION_ELEMENT)?;
        let span = regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| BumpError::field_not_found("csproj"))?;

        Ok(format!(
            "{}{}{}",
            &contents[..span.start()],
            version,
            &contents[span.end()..]
        ))
    }
}
