//! JSON manifests (`package.json`, lock files, ...)
//!
//! The document is re-serialised, so key order is kept (`preserve_order`) but
//! formatting is reduced to the detected indent and line ending.

use super::newline;
use super::VersionUpdater;
use crate::error::{BumpError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

pub struct JsonUpdater;

impl VersionUpdater for JsonUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let document: Value = serde_json::from_str(contents)?;
        match document.get("version") {
            Some(Value::String(version)) => Ok(version.clone()),
            _ => Err(BumpError::field_not_found("json")),
        }
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let mut document: Value = serde_json::from_str(contents)?;
        let root = document
            .as_object_mut()
            .ok_or_else(|| BumpError::field_not_found("json"))?;

        root.insert("version".to_string(), Value::String(version.to_string()));

        // lockfile v2+ mirrors the root package under `packages[""]`
        if let Some(Value::Object(package)) = root
            .get_mut("packages")
            .and_then(|packages| packages.get_mut(""))
        {
            if package.contains_key("version") {
                package.insert("version".to_string(), Value::String(version.to_string()));
            }
        }

        stringify(&document, &newline::detect_indent(contents), newline::detect(contents))
    }
}

fn stringify(document: &Value, indent: &str, newline: &str) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;

    let text = String::from_utf8(buffer)
        .map_err(|e| BumpError::config(format!("Non UTF-8 JSON output: {}", e)))?;

    let mut output = newline::normalize(&text, newline);
    output.push_str(newline);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = r#"{
  "name": "demo",
  "version": "1.0.0",
  "private": true,
  "dependencies": {
    "left-pad": "^1.3.0"
  }
}
"#;

    #[test]
    fn test_read_version() {
        assert_eq!(JsonUpdater.read_version(PACKAGE).unwrap(), "1.0.0");
    }

    #[test]
    fn test_write_preserves_order_and_other_keys() {
        let out = JsonUpdater.write_version(PACKAGE, "1.1.0").unwrap();
        assert_eq!(out, PACKAGE.replace("1.0.0", "1.1.0"));
    }

    #[test]
    fn test_write_keeps_four_space_indent() {
        let input = "{\n    \"name\": \"demo\",\n    \"version\": \"1.0.0\"\n}\n";
        let out = JsonUpdater.write_version(input, "2.0.0").unwrap();
        assert_eq!(out, "{\n    \"name\": \"demo\",\n    \"version\": \"2.0.0\"\n}\n");
    }

    #[test]
    fn test_write_keeps_tab_indent() {
        let input = "{\n\t\"version\": \"1.0.0\"\n}\n";
        let out = JsonUpdater.write_version(input, "1.0.1").unwrap();
        assert_eq!(out, "{\n\t\"version\": \"1.0.1\"\n}\n");
    }

    #[test]
    fn test_write_keeps_crlf() {
        let input = "{\r\n  \"name\": \"demo\",\r\n  \"version\": \"1.0.0\"\r\n}\r\n";
        let out = JsonUpdater.write_version(input, "1.0.1").unwrap();
        assert_eq!(
            out,
            "{\r\n  \"name\": \"demo\",\r\n  \"version\": \"1.0.1\"\r\n}\r\n"
        );
    }

    #[test]
    fn test_write_adds_missing_version() {
        let out = JsonUpdater.write_version("{\n  \"name\": \"x\"\n}", "0.1.0").unwrap();
        assert_eq!(JsonUpdater.read_version(&out).unwrap(), "0.1.0");
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_write_keeps_number_literals() {
        let input = "{\n  \"version\": \"1.0.0\",\n  \"n\": 1e3,\n  \"f\": 1.10,\n  \"big\": 123456789012345678901234567890\n}\n";
        let out = JsonUpdater.write_version(input, "1.0.1").unwrap();
        assert_eq!(out, input.replace("1.0.0", "1.0.1"));
    }

    #[test]
    fn test_write_updates_lockfile_root_package() {
        let lock = r#"{
  "name": "demo",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "packages": {
    "": {
      "name": "demo",
      "version": "1.0.0"
    },
    "node_modules/left-pad": {
      "version": "1.3.0"
    }
  }
}
"#;
        let out = JsonUpdater.write_version(lock, "1.1.0").unwrap();
        let doc: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["version"], "1.1.0");
        assert_eq!(doc["packages"][""]["version"], "1.1.0");
        assert_eq!(doc["packages"]["node_modules/left-pad"]["version"], "1.3.0");
    }

    #[test]
    fn test_read_missing_version_fails() {
        let err = JsonUpdater.read_version("{\"name\": \"x\"}").unwrap_err();
        assert!(matches!(err, BumpError::VersionFieldNotFound(_)));
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(matches!(
            JsonUpdater.read_version("{ not json"),
            Err(BumpError::Json(_))
        ));
    }
}
