//! Main release workflow
//!
//! Runs the release steps in order, each gated by its `skip` flag:
//! 1. Read the current version from the package files (or git tags)
//! 2. Resolve the next version from `release_as` or the commit history
//! 3. Bump every bump file
//! 4. Update the changelog
//! 5. Commit the release files
//! 6. Tag the release
//!
//! Lifecycle scripts run around each step. Nothing here parses flags, so the
//! workflow can be driven programmatically.

use anyhow::{bail, Context, Result};
use jiff::Zoned;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::bump::{self, BumpResult, UpdateOptions};
use crate::changelog;
use crate::config::Config;
use crate::conventional::recommend_bump;
use crate::error::BumpError;
use crate::git::{latest_semver_tag, CommitInfo, SemverTag, VersionControl};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::resolve::{next_version, ReleaseAs, ReleaseSignal, ResolveOptions};
use crate::ui::{self, Reporter};
use crate::updaters::UpdaterRegistry;

/// Result of a release run
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub current_version: String,
    pub new_version: String,
    /// Package file the current version came from; `None` when taken from git tags
    pub version_source: Option<String>,
    pub bump: BumpResult,
    /// Changelog path, when it was written
    pub changelog: Option<PathBuf>,
    /// Hash of the release commit
    pub commit: Option<String>,
    /// Tag name, when a tag was created
    pub tag: Option<String>,
}

struct Workflow<'a> {
    config: &'a Config,
    root: &'a Path,
    reporter: Reporter,
    current_version: String,
    new_version: Option<String>,
}

impl Workflow<'_> {
    fn run_hook(&self, hook: HookType) -> Result<Option<String>> {
        let script = match self.config.scripts.get(hook) {
            Some(script) => script,
            None => return Ok(None),
        };

        self.reporter
            .checkpoint(&format!("Running lifecycle script \"{}\"", hook.name()));
        if self.config.dry_run {
            return Ok(None);
        }

        let context = HookContext {
            hook_type: hook,
            current_version: self.current_version.clone(),
            new_version: self.new_version.clone(),
            tag_prefix: self.config.tag_prefix.clone(),
            dry_run: self.config.dry_run,
        };

        let output = HookExecutor::execute(script, &context, self.root)?;
        if !output.is_empty() {
            self.reporter.status(&output);
        }
        Ok(Some(output))
    }

    fn warn(&self, warnings: &[BoundaryWarning]) {
        for warning in warnings {
            self.reporter.warning(warning);
        }
    }
}

/// Main release workflow
///
/// # Arguments
///
/// * `config` - Configuration with command line overrides applied
/// * `root` - Project root the configured files are relative to
/// * `vcs` - Repository used for tags, history, ignore checks, commit and tag
/// * `registry` - Updater registry, including any custom updaters
///
/// # Returns
///
/// What was released, or the first fatal error
pub fn run_release(
    config: &Config,
    root: &Path,
    vcs: &dyn VersionControl,
    registry: &UpdaterRegistry,
) -> Result<ReleaseOutcome> {
    let reporter = Reporter::new(config.silent);

    // validate before anything runs or is touched
    let mut release_as = config
        .release_as
        .as_deref()
        .map(ReleaseAs::parse)
        .transpose()?;
    let prerelease = config.prerelease_identifier();

    let lookup = bump::read_current_version(root, &config.package_specs(), registry)
        .context("Failed to read the current version")?;

    let tags = vcs.tag_names().context("Failed to list git tags")?;
    let latest_tag = latest_semver_tag(&tags, &config.tag_prefix, prerelease.as_deref());

    let (current_version, version_source) = match lookup.current {
        Some(current) => (current.version, Some(current.file)),
        None if config.git_tag_fallback => {
            let version = latest_tag
                .as_ref()
                .map(|tag| tag.version.to_string())
                .unwrap_or_else(|| "1.0.0".to_string());
            reporter.warning(&BoundaryWarning::VersionFromTag {
                version: version.clone(),
            });
            (version, None)
        }
        None => bail!("no package file found"),
    };

    let mut workflow = Workflow {
        config,
        root,
        reporter,
        current_version: current_version.clone(),
        new_version: None,
    };
    workflow.warn(&lookup.warnings);

    let current = BumpError::parse_version(&current_version)?;

    let commits = commits_since(vcs, latest_tag.as_ref())?;
    if commits.is_empty() {
        if let (Some(tag), Some(head)) = (latest_tag.as_ref(), vcs.head_hash()?) {
            workflow.warn(&[BoundaryWarning::NoNewCommits {
                latest_tag: tag.name.clone(),
                current_commit_hash: head,
            }]);
        }
    }

    workflow.run_hook(HookType::PreRelease)?;

    // bump
    let mut bump_result = BumpResult {
        version: current_version.clone(),
        ..BumpResult::default()
    };
    let next = if config.skip.bump {
        current.clone()
    } else {
        if let Some(output) = workflow.run_hook(HookType::PreBump)? {
            let candidate = output.trim().replace(['"', '\''], "");
            if let Ok(ReleaseAs::Exact(version)) = candidate.parse::<ReleaseAs>() {
                tracing::debug!(%version, "prebump script overrides release_as");
                release_as = Some(ReleaseAs::Exact(version));
            }
        }

        let signal = match release_as {
            Some(release_as) => Some(ReleaseSignal::Explicit(release_as)),
            None if config.first_release => None,
            None => {
                let messages: Vec<String> = commits.iter().map(|c| c.message.clone()).collect();
                let recommendation = recommend_bump(&messages, &config.conventional_commits);
                tracing::debug!(
                    release_type = %recommendation.release_type,
                    reason = %recommendation.reason,
                    "recommended release type"
                );
                Some(ReleaseSignal::Recommended(recommendation.release_type))
            }
        };

        let next = next_version(
            &current,
            &ResolveOptions {
                signal,
                prerelease: prerelease.clone(),
                first_release: config.first_release,
                skip_bump: false,
            },
        )?;
        workflow.new_version = Some(next.to_string());

        if !config.first_release {
            workflow.reporter.checkpoint(&ui::format_release(
                &current_version,
                &next.to_string(),
                &format!("{}{}", config.tag_prefix, next),
            ));
        }

        if config.first_release {
            workflow
                .reporter
                .checkpoint("skip version bump on first release");
        } else {
            bump_result = bump::update_files(
                root,
                &config.bump_specs(),
                &next.to_string(),
                &UpdateOptions {
                    dry_run: config.dry_run,
                    primary: version_source.as_deref(),
                    vcs: Some(vcs),
                },
                registry,
            )
            .context("Failed to bump versions")?;

            for change in &bump_result.changes {
                let file = change
                    .path
                    .strip_prefix(root)
                    .unwrap_or(&change.path)
                    .display()
                    .to_string();
                workflow
                    .reporter
                    .checkpoint(&ui::format_bump(&file, &change.from, &change.to));
            }
            workflow.warn(&bump_result.warnings);
        }

        workflow.run_hook(HookType::PostBump)?;
        next
    };
    workflow.new_version = Some(next.to_string());
    let tag_name = format!("{}{}", config.tag_prefix, next);

    // changelog
    let changelog_path = root.join(&config.infile);
    let mut changelog_file = None;
    if !config.skip.changelog {
        workflow.run_hook(HookType::PreChangelog)?;

        let date = Zoned::now().strftime("%Y-%m-%d").to_string();
        let release = changelog::render_release(&next, &date, &commits, &config.conventional_commits);

        if config.dry_run {
            workflow.reporter.status(&format!("\n---\n{}\n---\n", release.trim()));
        } else {
            let created = changelog::update_file(&changelog_path, &config.header, &release)
                .with_context(|| format!("Failed to update {}", changelog_path.display()))?;
            if created {
                workflow
                    .reporter
                    .checkpoint(&format!("created {}", config.infile.display()));
            }
            changelog_file = Some(changelog_path.clone());
        }
        workflow
            .reporter
            .checkpoint(&format!("outputting changes to {}", config.infile.display()));

        workflow.run_hook(HookType::PostChangelog)?;
    }

    // commit
    let mut commit = None;
    if !config.skip.commit {
        workflow.run_hook(HookType::PreCommit)?;

        let mut paths: Vec<PathBuf> = bump_result.updated_files.clone();
        if !config.skip.changelog {
            paths.push(changelog_path.clone());
        }

        let listed: Vec<String> = paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
            .collect();
        workflow.reporter.checkpoint(&format!(
            "committing {}",
            if config.commit_all {
                "all staged files".to_string()
            } else {
                listed.join(" and ")
            }
        ));

        if !config.dry_run {
            let message = config.release_commit_message(&tag_name);
            let hash = vcs
                .commit(&paths, config.commit_all, &message)
                .context("Failed to create the release commit")?;
            commit = Some(hash);
        }

        workflow.run_hook(HookType::PostCommit)?;
    }

    // tag
    let mut tag = None;
    if !config.skip.tag {
        workflow.run_hook(HookType::PreTag)?;

        workflow
            .reporter
            .checkpoint(&format!("tagging release {}", tag_name));
        if !config.dry_run {
            let message = config.release_commit_message(&tag_name);
            vcs.create_tag(&tag_name, &message, config.tag_force)
                .with_context(|| format!("Failed to create tag {}", tag_name))?;
            tag = Some(tag_name.clone());
        }

        workflow.run_hook(HookType::PostTag)?;
        workflow
            .reporter
            .status(&ui::format_publish_instruction(&tag_name));
    }

    Ok(ReleaseOutcome {
        current_version,
        new_version: next.to_string(),
        version_source,
        bump: bump_result,
        changelog: changelog_file,
        commit,
        tag,
    })
}

fn commits_since(vcs: &dyn VersionControl, tag: Option<&SemverTag>) -> Result<Vec<CommitInfo>> {
    vcs.commits_since(tag.map(|t| t.name.as_str()))
        .context("Failed to read commits since the last release")
}
