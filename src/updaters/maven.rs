//! Maven `pom.xml`
//!
//! Only the text of `project > version` is spliced; the rest of the document
//! (comments, dependency versions, parent versions, whitespace) is returned
//! byte for byte.

use super::VersionUpdater;
use crate::error::{BumpError, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::ops::Range;

pub struct MavenUpdater;

impl VersionUpdater for MavenUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let span = project_version_span(contents)?;
        let raw = contents[span].trim();
        unescape(raw)
            .map(|value| value.into_owned())
            .map_err(|e| BumpError::xml(format!("Invalid project version text: {}", e)))
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        let span = project_version_span(contents)?;
        let mut output = String::with_capacity(contents.len() + version.len());
        output.push_str(&contents[..span.start]);
        output.push_str(&escape(version));
        output.push_str(&contents[span.end..]);
        Ok(output)
    }
}

/// Byte range of the text inside the top-level `<project><version>` element
fn project_version_span(contents: &str) -> Result<Range<usize>> {
    let mut reader = Reader::from_str(contents);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut start = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                path.push(element.local_name().as_ref().to_vec());
                if is_project_version(&path) {
                    start = Some(reader.buffer_position() as usize);
                }
            }
            Ok(Event::End(_)) => {
                if is_project_version(&path) {
                    if let Some(start) = start {
                        let after = reader.buffer_position() as usize;
                        let end = contents[..after]
                            .rfind("</")
                            .ok_or_else(|| BumpError::xml("Unterminated version element"))?;
                        return Ok(start..end);
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(BumpError::xml(format!(
                    "Error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    Err(BumpError::field_not_found("pom.xml"))
}

fn is_project_version(path: &[Vec<u8>]) -> bool {
    path.len() == 2 && path[0] == b"project" && path[1] == b"version"
}
