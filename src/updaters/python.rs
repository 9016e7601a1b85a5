use super::{compile, VersionUpdater};
use crate::error::{BumpError, Result};

const VERSION_ASSIGNMENT: &str = r#"(?i)version[_" ]*=[ ]*["']([^"'\r\n]*)["']"#;

/// Python packaging files (`pyproject.toml`, `setup.py`, `__init__.py`)
///
/// Picks up the first `version = "..."`, `__version__ = '...'` or
/// `"version" = "..."` style assignment.
pub struct PythonUpdater;

impl VersionUpdater for PythonUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let regex = compile(VERSION_ASSIGNMENT)?;
        regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| BumpError::field_not_found("python"))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let regex = compile(VERSION_ASSIGNMENT)?;
        let span = regex
            .captures(contents)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| BumpError::field_not_found("python"))?;

        Ok(format!(
            "{}{}{}",
            &contents[..span.start()],
            version,
            &contents[span.end()..]
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyproject() {
        let toml = "[project]\nname = \"demo\"\nversion = \"0.3.1\"\nrequires-python = \">=3.9\"\n";
        assert_eq!(PythonUpdater.read_version(toml).unwrap(), "0.3.1");
        let out = PythonUpdater.write_version(toml, "0.4.0").unwrap();
        assert_eq!(out, toml.replace("0.3.1", "0.4.0"));
    }

    #[test]
    fn test_dunder_version() {
        let init = "\"\"\"Demo\"\"\"\n__version__ = '1.2.3'\n";
        assert_eq!(PythonUpdater.read_version(init).unwrap(), "1.2.3");
        let out = PythonUpdater.write_version(init, "1.2.4").unwrap();
        assert_eq!(out, "\"\"\"Demo\"\"\"\n__version__ = '1.2.4'\n");
    }

    #[test]
    fn test_setup_py_keyword() {
        let setup = "setup(\n    name='demo',\n    version='2.0.0',\n)\n";
        let out = PythonUpdater.write_version(setup, "2.1.0").unwrap();
        assert_eq!(out, setup.replace("2.0.0", "2.1.0"));
    }

    #[test]
    fn test_only_first_assignment_changes() {
        let toml = "version = \"1.0.0\"\n[tool.other]\nversion = \"7.7.7\"\n";
        let out = PythonUpdater.write_version(toml, "1.0.1").unwrap();
        assert_eq!(out, "version = \"1.0.1\"\n[tool.other]\nversion = \"7.7.7\"\n");
    }

    #[test]
    fn test_missing_version_is_an_error() {
        let toml = "[project]\nname = \"demo\"\n";
        assert!(matches!(
            PythonUpdater.write_version(toml, "1.0.0"),
            Err(BumpError::VersionFieldNotFound(_))
        ));
    }
}
