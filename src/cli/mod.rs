//! Command line interface
//!
//! [Cli] holds the parsed flags; [Cli::apply] layers them over the loaded
//! configuration. The release itself lives in [orchestration].

pub mod orchestration;

pub use orchestration::{run_release, ReleaseOutcome};

use crate::config::{Config, PrereleaseSetting};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "git-bump",
    version,
    about = "Bump versions, write the changelog, commit and tag a release based on conventional commits"
)]
pub struct Cli {
    #[arg(long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Release as a specific type (major, minor, patch) or an exact version"
    )]
    pub release_as: Option<String>,

    #[arg(
        short,
        long,
        num_args = 0..=1,
        value_name = "ID",
        help = "Make a prerelease, optionally with an identifier (alpha, beta, rc)"
    )]
    pub prerelease: Option<Option<String>>,

    #[arg(short, long, help = "Prefix for version tags")]
    pub tag_prefix: Option<String>,

    #[arg(short, long, help = "First release: keep the current version")]
    pub first_release: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(long, help = "Do not print checkpoints")]
    pub silent: bool,

    #[arg(short = 'a', long, help = "Commit all tracked changes, not just the release files")]
    pub commit_all: bool,

    #[arg(long, help = "Replace an existing tag")]
    pub tag_force: bool,

    #[arg(long, help = "Fail instead of reading the version from git tags when no package file has one")]
    pub no_git_tag_fallback: bool,

    #[arg(short, long, help = "Changelog file to update")]
    pub infile: Option<PathBuf>,

    #[arg(long, help = "Do not bump versions in files")]
    pub skip_bump: bool,

    #[arg(long, help = "Do not update the changelog")]
    pub skip_changelog: bool,

    #[arg(long, help = "Do not create the release commit")]
    pub skip_commit: bool,

    #[arg(long, help = "Do not create the release tag")]
    pub skip_tag: bool,

    #[arg(long, help = "Print debug logs")]
    pub verbose: bool,

    #[arg(long, help = "Project root (defaults to the current directory)")]
    pub path: Option<PathBuf>,
}

impl Cli {
    /// Override configuration values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref release_as) = self.release_as {
            config.release_as = Some(release_as.clone());
        }
        if let Some(ref prerelease) = self.prerelease {
            config.prerelease = Some(match prerelease {
                Some(id) => PrereleaseSetting::Identifier(id.clone()),
                None => PrereleaseSetting::Flag(true),
            });
        }
        if let Some(ref prefix) = self.tag_prefix {
            config.tag_prefix = prefix.clone();
        }
        if let Some(ref infile) = self.infile {
            config.infile = infile.clone();
        }

        config.first_release |= self.first_release;
        config.dry_run |= self.dry_run;
        config.silent |= self.silent;
        config.commit_all |= self.commit_all;
        config.tag_force |= self.tag_force;
        if self.no_git_tag_fallback {
            config.git_tag_fallback = false;
        }

        config.skip.bump |= self.skip_bump;
        config.skip.changelog |= self.skip_changelog;
        config.skip.commit |= self.skip_commit;
        config.skip.tag |= self.skip_tag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("git-bump").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_prerelease_flag_forms() {
        assert_eq!(parse(&[]).prerelease, None);
        assert_eq!(parse(&["--prerelease"]).prerelease, Some(None));
        assert_eq!(
            parse(&["-p", "beta"]).prerelease,
            Some(Some("beta".to_string()))
        );
    }

    #[test]
    fn test_apply_overrides() {
        let cli = parse(&[
            "-r",
            "minor",
            "--prerelease",
            "--tag-prefix",
            "release-",
            "--skip-changelog",
            "--no-git-tag-fallback",
        ]);

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.release_as.as_deref(), Some("minor"));
        assert_eq!(config.prerelease_identifier(), Some(String::new()));
        assert_eq!(config.tag_prefix, "release-");
        assert!(config.skip.changelog);
        assert!(!config.skip.commit);
        assert!(!config.git_tag_fallback);
    }

    #[test]
    fn test_apply_keeps_file_values() {
        let mut config = Config {
            tag_prefix: "app-".to_string(),
            dry_run: true,
            ..Config::default()
        };
        parse(&[]).apply(&mut config);
        assert_eq!(config.tag_prefix, "app-");
        assert!(config.dry_run);
    }
}
