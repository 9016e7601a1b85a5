use crate::config::ConventionalCommitsConfig;
use crate::domain::ReleaseType;
use regex::Regex;

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
    /// Text following a breaking change footer
    pub breaking_notes: Vec<String>,
}

impl ParsedCommit {
    /// Parse a commit message according to conventional commits
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text (parsed as a `chore`)
    ///
    /// Footers starting with one of `config.breaking_change_indicators` mark
    /// the commit as breaking and are collected as notes.
    pub fn parse(message: &str, config: &ConventionalCommitsConfig) -> Self {
        let header = message.lines().next().unwrap_or_default();

        let breaking_notes: Vec<String> = message
            .lines()
            .skip(1)
            .filter_map(|line| {
                config
                    .breaking_change_indicators
                    .iter()
                    .find_map(|indicator| line.strip_prefix(indicator.as_str()))
                    .map(|note| note.trim().to_string())
            })
            .collect();

        if let Some(captures) = Regex::new(r"^(\w+)(?:\(([^)]*)\))?(!)?:\s*(.*)$")
            .ok()
            .and_then(|re| re.captures(header))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let scope = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty());
            let has_exclamation = captures.get(3).is_some();
            let description = captures
                .get(4)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope,
                is_breaking_change: has_exclamation || !breaking_notes.is_empty(),
                breaking_notes: if has_exclamation && breaking_notes.is_empty() {
                    vec![description.clone()]
                } else {
                    breaking_notes
                },
                description,
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "chore".to_string(),
            scope: None,
            description: header.to_string(),
            is_breaking_change: !breaking_notes.is_empty(),
            breaking_notes,
        }
    }
}

/// A release type recommended from commit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub release_type: ReleaseType,
    pub reason: String,
}

/// Recommend a release type for the commits since the last release.
///
/// Any breaking change asks for a major release, any commit type listed in
/// `config.minor_types` for a minor one, anything else for a patch.
pub fn recommend_bump(commit_messages: &[String], config: &ConventionalCommitsConfig) -> Recommendation {
    let mut breaking = 0;
    let mut features = 0;

    for message in commit_messages {
        let parsed = ParsedCommit::parse(message, config);
        if parsed.is_breaking_change {
            breaking += 1;
        } else if config.minor_types.contains(&parsed.r#type) {
            features += 1;
        }
    }

    let release_type = if breaking > 0 {
        ReleaseType::Major
    } else if features > 0 {
        ReleaseType::Minor
    } else {
        ReleaseType::Patch
    };

    Recommendation {
        release_type,
        reason: format!(
            "There are {} BREAKING CHANGES and {} features",
            breaking, features
        ),
    }
}
