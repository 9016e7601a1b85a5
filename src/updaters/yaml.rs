//! YAML documents
//!
//! Two flavours share this module: a generic one for a top-level `version`
//! key (`pubspec.yaml`, Helm charts, ...) and an OpenAPI one for
//! `info.version`.
//!
//! The scalar is edited in place so that comments, quoting, anchors and key
//! order survive. The edit is parsed back and checked. Shapes the line editor
//! does not handle (flow mappings, block scalars, anchored or tagged values)
//! are rejected with [BumpError::VersionFieldNotFound], never re-serialised.

use super::newline;
use super::VersionUpdater;
use crate::error::{BumpError, Result};
use serde_yaml::Value;
use std::ops::Range;

/// Top-level `version` key
pub struct YamlUpdater;

/// OpenAPI `info.version`
pub struct OpenApiUpdater;

impl VersionUpdater for YamlUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let document: Value = serde_yaml::from_str(contents)?;
        document
            .get("version")
            .and_then(scalar_text)
            .ok_or_else(|| BumpError::field_not_found("yaml"))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let lines = split_lines(contents);
        let edited = match find_scalar(&lines, 0, "version") {
            Some(span) => Some(splice(contents, span, version)),
            None if lines.iter().any(|l| starts_key(l.body, "version")) => None,
            None => Some(append_line(contents, &format!("version: {}", version))),
        };

        finish(self, contents, edited, version, "yaml")
    }
}

impl VersionUpdater for OpenApiUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let document: Value = serde_yaml::from_str(contents)?;
        document
            .get("info")
            .and_then(|info| info.get("version"))
            .and_then(scalar_text)
            .ok_or_else(|| BumpError::field_not_found("openapi"))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let edited = edit_info_version(contents, version);

        finish(self, contents, edited, version, "openapi")
    }
}

struct Line<'a> {
    start: usize,
    end: usize,
    /// Line text without its terminator
    body: &'a str,
}

fn split_lines(contents: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    contents
        .split_inclusive('\n')
        .map(|raw| {
            let line = Line {
                start: offset,
                end: offset + raw.len(),
                body: raw.trim_end_matches(['\r', '\n']),
            };
            offset += raw.len();
            line
        })
        .collect()
}

fn indent_of(body: &str) -> usize {
    body.len() - body.trim_start_matches([' ', '\t']).len()
}

fn is_blank_or_comment(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// `key:` at column zero, whatever follows
fn starts_key(body: &str, key: &str) -> bool {
    body.strip_prefix(key)
        .map(|rest| rest.trim_start_matches([' ', '\t']).starts_with(':'))
        .unwrap_or(false)
}

/// `key:` at column zero opening a nested block
fn opens_block(body: &str, key: &str) -> bool {
    body.strip_prefix(key)
        .and_then(|rest| rest.trim_start_matches([' ', '\t']).strip_prefix(':'))
        .map(is_blank_or_comment)
        .unwrap_or(false)
}

/// Byte range (within `body`) of the plain or quoted scalar assigned to `key`
fn scalar_span(body: &str, indent: usize, key: &str) -> Option<Range<usize>> {
    if indent_of(body) != indent {
        return None;
    }
    let value = body[indent..]
        .strip_prefix(key)?
        .trim_start_matches([' ', '\t'])
        .strip_prefix(':')?
        .trim_start_matches([' ', '\t']);
    let offset = body.len() - value.len();

    match value.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = value[1..].find(quote)?;
            Some(offset + 1..offset + 1 + close)
        }
        '#' | '|' | '>' | '&' | '*' | '!' | '{' | '[' => None,
        _ => {
            let end = value
                .find(" #")
                .or_else(|| value.find("\t#"))
                .unwrap_or(value.len());
            Some(offset..offset + value[..end].trim_end().len())
        }
    }
}

/// Absolute byte range of `key`'s scalar among lines indented by exactly `indent`
fn find_scalar(lines: &[Line<'_>], indent: usize, key: &str) -> Option<Range<usize>> {
    lines.iter().find_map(|line| {
        scalar_span(line.body, indent, key).map(|span| line.start + span.start..line.start + span.end)
    })
}

fn edit_info_version(contents: &str, version: &str) -> Option<String> {
    let lines = split_lines(contents);
    let info = lines.iter().position(|line| opens_block(line.body, "info"))?;

    let block: Vec<&Line<'_>> = lines[info + 1..]
        .iter()
        .take_while(|line| is_blank_or_comment(line.body) || indent_of(line.body) > 0)
        .collect();
    let child_indent = block
        .iter()
        .find(|line| !is_blank_or_comment(line.body))
        .map(|line| indent_of(line.body));

    if let Some(indent) = child_indent {
        let found = block.iter().find_map(|line| {
            scalar_span(line.body, indent, "version")
                .map(|span| line.start + span.start..line.start + span.end)
        });
        if let Some(span) = found {
            return Some(splice(contents, span, version));
        }
        if block
            .iter()
            .any(|line| line.body[indent_of(line.body)..].starts_with("version"))
        {
            return None;
        }
    }

    let eol = newline::detect(contents);
    let header = &lines[info];
    let mut output = String::with_capacity(contents.len() + version.len() + 16);
    output.push_str(&contents[..header.end]);
    if !contents[..header.end].ends_with('\n') {
        output.push_str(eol);
    }
    output.push_str(&" ".repeat(child_indent.unwrap_or(2)));
    output.push_str("version: ");
    output.push_str(version);
    output.push_str(eol);
    output.push_str(&contents[header.end..]);
    Some(output)
}

fn splice(contents: &str, span: Range<usize>, version: &str) -> String {
    format!("{}{}{}", &contents[..span.start], version, &contents[span.end..])
}

fn append_line(contents: &str, line: &str) -> String {
    let eol = newline::detect(contents);
    let mut output = contents.to_string();
    if !output.is_empty() && !output.ends_with('\n') {
        output.push_str(eol);
    }
    output.push_str(line);
    output.push_str(eol);
    output
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Accept the line edit only when it parses back to `version`
fn finish(
    updater: &dyn VersionUpdater,
    contents: &str,
    edited: Option<String>,
    version: &str,
    format: &str,
) -> Result<String> {
    match edited {
        Some(edited) if updater.read_version(&edited).ok().as_deref() == Some(version) => {
            Ok(newline::normalize(&edited, newline::detect(contents)))
        }
        _ => {
            // the document must still parse, so syntax errors surface as such
            serde_yaml::from_str::<Value>(contents)?;
            tracing::warn!(format, "version is not a plain scalar the line editor can rewrite");
            Err(BumpError::field_not_found(format))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBSPEC: &str = "name: demo\n# bumped on release\nversion: 1.0.0 # keep in sync\nenvironment:\n  sdk: '>=3.0.0 <4.0.0'\n";

    const OPENAPI: &str = "openapi: 3.0.3\ninfo:\n  title: Demo API\n  version: \"1.0.0\"\n  description: |\n    version: 0.0.1 is mentioned here\npaths: {}\n";

    #[test]
    fn test_yaml_read() {
        assert_eq!(YamlUpdater.read_version(PUBSPEC).unwrap(), "1.0.0");
    }

    #[test]
    fn test_yaml_write_keeps_comments() {
        let out = YamlUpdater.write_version(PUBSPEC, "1.1.0").unwrap();
        assert_eq!(out, PUBSPEC.replace("version: 1.0.0", "version: 1.1.0"));
    }

    #[test]
    fn test_yaml_write_keeps_quotes_and_crlf() {
        let input = "name: demo\r\nversion: '1.0.0'\r\n";
        let out = YamlUpdater.write_version(input, "2.0.0-rc.0").unwrap();
        assert_eq!(out, "name: demo\r\nversion: '2.0.0-rc.0'\r\n");
    }

    #[test]
    fn test_yaml_ignores_nested_version() {
        let input = "dependency:\n  version: 9.9.9\nversion: 1.0.0\n";
        let out = YamlUpdater.write_version(input, "1.0.1").unwrap();
        assert_eq!(out, "dependency:\n  version: 9.9.9\nversion: 1.0.1\n");
    }

    #[test]
    fn test_yaml_inserts_missing_version() {
        let out = YamlUpdater.write_version("name: demo\n", "0.1.0").unwrap();
        assert_eq!(out, "name: demo\nversion: 0.1.0\n");
    }

    #[test]
    fn test_yaml_flow_mapping_is_rejected() {
        let err = YamlUpdater
            .write_version("{name: demo, version: 1.0.0}\n", "1.2.0")
            .unwrap_err();
        assert!(matches!(err, BumpError::VersionFieldNotFound(_)));
    }

    #[test]
    fn test_yaml_anchored_version_is_rejected() {
        let input = "# release metadata\nversion: &v 1.0.0\nchart:\n  appVersion: *v\n";
        assert_eq!(YamlUpdater.read_version(input).unwrap(), "1.0.0");
        let err = YamlUpdater.write_version(input, "1.1.0").unwrap_err();
        assert!(matches!(err, BumpError::VersionFieldNotFound(_)));
    }

    #[test]
    fn test_yaml_numeric_version_reads_as_text() {
        assert_eq!(YamlUpdater.read_version("version: 2\n").unwrap(), "2");
    }

    #[test]
    fn test_openapi_read() {
        assert_eq!(OpenApiUpdater.read_version(OPENAPI).unwrap(), "1.0.0");
    }

    #[test]
    fn test_openapi_write_only_info_version() {
        let out = OpenApiUpdater.write_version(OPENAPI, "1.1.0").unwrap();
        assert_eq!(out, OPENAPI.replace("version: \"1.0.0\"", "version: \"1.1.0\""));
        assert!(out.contains("version: 0.0.1 is mentioned here"));
    }

    #[test]
    fn test_openapi_inserts_version_into_info() {
        let input = "openapi: 3.0.3\ninfo:\n    title: Demo\npaths: {}\n";
        let out = OpenApiUpdater.write_version(input, "0.2.0").unwrap();
        assert_eq!(
            out,
            "openapi: 3.0.3\ninfo:\n    version: 0.2.0\n    title: Demo\npaths: {}\n"
        );
    }

    #[test]
    fn test_openapi_without_info_fails() {
        let err = OpenApiUpdater
            .write_version("openapi: 3.0.3\npaths: {}\n", "1.0.0")
            .unwrap_err();
        assert!(matches!(err, BumpError::VersionFieldNotFound(_)));
    }

    #[test]
    fn test_openapi_read_missing() {
        assert!(OpenApiUpdater.read_version("openapi: 3.0.3\n").is_err());
    }
}
