use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, VersionControl};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A commit recorded by [MockRepository::commit]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub paths: Vec<PathBuf>,
    pub all: bool,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// Tags map to the number of history entries present when they were made, so
/// `commits_since` returns everything added after the tag.
#[derive(Default)]
pub struct MockRepository {
    history: RefCell<Vec<CommitInfo>>,
    tags: RefCell<Vec<(String, usize)>>,
    ignored: HashSet<PathBuf>,
    commits: RefCell<Vec<RecordedCommit>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit to the history
    pub fn add_commit(&mut self, message: impl Into<String>) {
        let mut history = self.history.borrow_mut();
        let hash = format!("{:040x}", history.len() + 1);
        history.push(CommitInfo {
            hash,
            message: message.into(),
            author: "Test Author".to_string(),
        });
    }

    /// Tag the current end of the history
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let position = self.history.borrow().len();
        self.tags.borrow_mut().push((name.into(), position));
    }

    /// Mark a path as ignored
    pub fn ignore(&mut self, path: impl Into<PathBuf>) {
        self.ignored.insert(path.into());
    }

    /// Commits made through [VersionControl::commit]
    pub fn recorded_commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }
}

impl VersionControl for MockRepository {
    fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().iter().map(|(name, _)| name.clone()).collect())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let start = match tag {
            Some(tag) => self
                .tags
                .borrow()
                .iter()
                .find(|(name, _)| name == tag)
                .map(|(_, position)| *position)
                .ok_or_else(|| BumpError::config(format!("Tag not found: {}", tag)))?,
            None => 0,
        };
        Ok(self.history.borrow()[start..].to_vec())
    }

    fn head_hash(&self) -> Result<Option<String>> {
        Ok(self.history.borrow().last().map(|c| c.hash.clone()))
    }

    fn is_path_ignored(&self, path: &Path) -> Result<bool> {
        Ok(self
            .ignored
            .iter()
            .any(|ignored| path == ignored || path.ends_with(ignored)))
    }

    fn commit(&self, paths: &[PathBuf], all: bool, message: &str) -> Result<String> {
        self.commits.borrow_mut().push(RecordedCommit {
            paths: paths.to_vec(),
            all,
            message: message.to_string(),
        });

        let mut history = self.history.borrow_mut();
        let hash = format!("{:040x}", history.len() + 1);
        history.push(CommitInfo {
            hash: hash.clone(),
            message: message.to_string(),
            author: "Test Author".to_string(),
        });
        Ok(hash)
    }

    fn create_tag(&self, name: &str, _message: &str, force: bool) -> Result<()> {
        let position = self.history.borrow().len();
        let mut tags = self.tags.borrow_mut();

        match tags.iter_mut().find(|(existing, _)| existing == name) {
            Some(_) if !force => Err(BumpError::config(format!("Tag already exists: {}", name))),
            Some(entry) => {
                entry.1 = position;
                Ok(())
            }
            None => {
                tags.push((name.to_string(), position));
                Ok(())
            }
        }
    }
}
