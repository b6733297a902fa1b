//! Repository wrapper for safe Git operations.

use crate::{GitCommit, GitError, GitResult};
use git2::{ErrorCode, Repository as Git2Repo};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Thread-safe repository wrapper.
#[derive(Clone)]
pub struct GitRepository {
    inner: Arc<Mutex<Git2Repo>>,
    root_path: PathBuf,
}

impl GitRepository {
    fn wrap(repo: Git2Repo, path: &Path) -> GitResult<Self> {
        let root_path = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::InvalidOperation {
                message: format!("{} is a bare repository", path.display()),
            })?;

        Ok(Self {
            inner: Arc::new(Mutex::new(repo)),
            root_path,
        })
    }

    /// Open the repository whose working directory is `path`.
    ///
    /// Parent directories are not searched, so a project nested inside
    /// another checkout is never committed to the outer repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::NotARepo {
                path: path.display().to_string(),
            },
            _ => GitError::Git2(e),
        })?;
        Self::wrap(repo, path)
    }

    /// Initialize a new repository.
    pub fn init(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::init(path)?;
        Self::wrap(repo, path)
    }

    /// Open the repository at `path`, creating it when there is none.
    ///
    /// The flag is `true` when a repository was created.
    pub fn open_or_init(path: impl AsRef<Path>) -> GitResult<(Self, bool)> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(repo) => Ok((repo, false)),
            Err(GitError::NotARepo { .. }) => {
                debug!(path = %path.display(), "initializing repository");
                Ok((Self::init(path)?, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Get the working directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Access the underlying git2 repository.
    pub fn with_repo<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Git2Repo) -> R,
    {
        let repo = self.inner.lock();
        f(&repo)
    }

    /// Access the underlying git2 repository mutably.
    pub fn with_repo_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Git2Repo) -> R,
    {
        let mut repo = self.inner.lock();
        f(&mut repo)
    }

    /// The commit HEAD points at, or `None` on an unborn branch.
    pub fn head_commit(&self) -> GitResult<Option<GitCommit>> {
        self.with_repo(|repo| match repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit()?;
                Ok(Some(GitCommit::from_git2(&commit)))
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        })
    }
}
