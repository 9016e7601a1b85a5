use crate::error::{BumpError, Result};
use crate::git::CommitInfo;
use git2::{Commit, ErrorCode, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `path` relative to the working directory, as the index expects it
    fn workdir_relative(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| BumpError::config("Repository has no working directory"))?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

        // the file itself may not exist yet, so canonicalize its directory
        let absolute = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf()),
            _ => path.to_path_buf(),
        };

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::config(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

impl super::VersionControl for Git2Repository {
    fn tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let head = match self.head_commit()? {
            Some(head) => head,
            None => return Ok(Vec::new()),
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL)?;
        revwalk.push(head.id())?;

        if let Some(tag) = tag {
            let reference = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag))?;
            let tagged = reference.peel_to_commit()?;
            revwalk.hide(tagged.id())?;
        }

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let message = commit.message().unwrap_or("(empty message)").to_string();

            let author = commit.author().name().unwrap_or("unknown").to_string();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message,
                author,
            });
        }

        commits.reverse();
        Ok(commits)
    }

    fn head_hash(&self) -> Result<Option<String>> {
        Ok(self.head_commit()?.map(|commit| commit.id().to_string()))
    }

    fn is_path_ignored(&self, path: &Path) -> Result<bool> {
        let relative = self.workdir_relative(path)?;
        Ok(self.repo.is_path_ignored(relative)?)
    }

    fn commit(&self, paths: &[PathBuf], all: bool, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;

        if all {
            index.update_all(["*"], None)?;
        }
        for path in paths {
            index.add_path(&self.workdir_relative(path)?)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parents: Vec<Commit<'_>> = self.head_commit()?.into_iter().collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parent_refs,
        )?;

        Ok(oid.to_string())
    }

    fn create_tag(&self, name: &str, message: &str, force: bool) -> Result<()> {
        let target = self
            .head_commit()?
            .ok_or_else(|| BumpError::config("Cannot tag a repository without commits"))?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, target.as_object(), &signature, message, force)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::VersionControl;
    use std::fs;
    use tempfile::TempDir;

    fn init() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Release Bot").unwrap();
            config.set_str("user.email", "bot@example.com").unwrap();
        }
        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_unborn_repository() {
        let (_dir, repo) = init();
        assert_eq!(repo.head_hash().unwrap(), None);
        assert!(repo.commits_since(None).unwrap().is_empty());
        assert!(repo.tag_names().unwrap().is_empty());
    }

    #[test]
    fn test_commit_tag_and_history() {
        let (dir, repo) = init();

        fs::write(dir.path().join("a.txt"), "one").unwrap();
        repo.commit(&[PathBuf::from("a.txt")], false, "feat: first")
            .unwrap();
        repo.create_tag("v1.0.0", "v1.0.0", false).unwrap();

        fs::write(dir.path().join("b.txt"), "two").unwrap();
        let hash = repo
            .commit(&[dir.path().join("b.txt")], false, "fix: second")
            .unwrap();

        assert_eq!(repo.head_hash().unwrap(), Some(hash));
        assert_eq!(repo.tag_names().unwrap(), vec!["v1.0.0".to_string()]);

        let since = repo.commits_since(Some("v1.0.0")).unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].message, "fix: second");
        assert_eq!(since[0].author, "Release Bot");

        let all = repo.commits_since(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "feat: first");
    }

    #[test]
    fn test_existing_tag_requires_force() {
        let (dir, repo) = init();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        repo.commit(&[PathBuf::from("a.txt")], false, "chore: init")
            .unwrap();

        repo.create_tag("v1.0.0", "v1.0.0", false).unwrap();
        assert!(repo.create_tag("v1.0.0", "v1.0.0", false).is_err());
        repo.create_tag("v1.0.0", "v1.0.0", true).unwrap();
    }

    #[test]
    fn test_ignored_paths() {
        let (dir, repo) = init();
        fs::write(dir.path().join(".gitignore"), "dist/\n").unwrap();

        assert!(repo.is_path_ignored(Path::new("dist/package.json")).unwrap());
        assert!(!repo.is_path_ignored(Path::new("package.json")).unwrap());
        assert!(repo
            .is_path_ignored(&dir.path().join("dist/package.json"))
            .unwrap());
    }
}
