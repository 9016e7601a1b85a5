//! Changelog generation
//!
//! A release section is rendered from the commits since the previous tag and
//! spliced in above the earlier releases of the existing changelog.

use crate::config::ConventionalCommitsConfig;
use crate::conventional::ParsedCommit;
use crate::error::{BumpError, Result};
use crate::git::CommitInfo;
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;

const START_OF_LAST_RELEASE: &str = r"(?m)^#+ \[?[0-9]+\.[0-9]+\.[0-9]+|<a name=";

/// Render the changelog section for one release.
///
/// Patch releases get a level three heading, everything else level two.
/// Breaking changes come first, then features and bug fixes; commits of other
/// types are left out.
pub fn render_release(
    version: &Version,
    date: &str,
    commits: &[CommitInfo],
    config: &ConventionalCommitsConfig,
) -> String {
    let level = if version.patch == 0 { "##" } else { "###" };

    let mut breaking = Vec::new();
    let mut features = Vec::new();
    let mut fixes = Vec::new();

    for commit in commits {
        let parsed = ParsedCommit::parse(&commit.message, config);
        let short_hash: String = commit.hash.chars().take(7).collect();

        for note in &parsed.breaking_notes {
            breaking.push(entry(parsed.scope.as_deref(), note, None));
        }
        match parsed.r#type.as_str() {
            "feat" => features.push(entry(
                parsed.scope.as_deref(),
                &parsed.description,
                Some(&short_hash),
            )),
            "fix" => fixes.push(entry(
                parsed.scope.as_deref(),
                &parsed.description,
                Some(&short_hash),
            )),
            _ => {}
        }
    }

    let mut output = format!("{} [{}] ({})\n\n", level, version, date);
    for (title, entries) in [
        ("⚠ BREAKING CHANGES", &breaking),
        ("Features", &features),
        ("Bug Fixes", &fixes),
    ] {
        if entries.is_empty() {
            continue;
        }
        output.push_str(&format!("\n### {}\n\n", title));
        for line in entries.iter() {
            output.push_str(line);
            output.push('\n');
        }
    }
    output.push('\n');
    output
}

fn entry(scope: Option<&str>, text: &str, hash: Option<&str>) -> String {
    let mut line = String::from("* ");
    if let Some(scope) = scope {
        line.push_str(&format!("**{}:** ", scope));
    }
    line.push_str(text);
    if let Some(hash) = hash {
        line.push_str(&format!(" ({})", hash));
    }
    line
}

/// Combine an existing changelog with a new release section.
///
/// Anything before `# Changelog` is kept as front matter. The old header is
/// dropped from the first earlier release heading on, `header` is put in its
/// place and trailing newlines are collapsed to one.
pub fn splice(existing: &str, header: &str, release: &str) -> Result<String> {
    let front_matter = existing
        .find("# Changelog")
        .map(|start| &existing[..start])
        .unwrap_or("");

    let pattern = Regex::new(START_OF_LAST_RELEASE)
        .map_err(|e| BumpError::config(format!("Regex error: {}", e)))?;
    let body = pattern
        .find(existing)
        .map(|m| &existing[m.start()..])
        .unwrap_or(existing);

    let content = format!("{}{}", release, body);
    let content = content.trim_end_matches('\n');

    Ok(format!("{}{}\n{}\n", front_matter, header, content))
}

/// Write `release` into the changelog at `path`, creating it when missing.
///
/// # Returns
/// * `Ok(true)` - The file was created
/// * `Ok(false)` - An existing file was updated
pub fn update_file(path: &Path, header: &str, release: &str) -> Result<bool> {
    let (existing, created) = match fs::read_to_string(path) {
        Ok(existing) => (existing, false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (String::new(), true),
        Err(e) => return Err(e.into()),
    };

    fs::write(path, splice(&existing, header, release)?)?;
    Ok(created)
}
