//! Git commit types and creation.

use crate::{GitError, GitOid, GitRepository, GitResult};
use git2::Signature;
use tracing::info;

/// Identity used when neither the options nor the git configuration
/// provide one.
pub const FALLBACK_AUTHOR: (&str, &str) = ("magic-react", "magic-react@localhost");

/// Git signature (author/committer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSignature {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Timestamp.
    pub when: chrono::DateTime<chrono::Utc>,
}

impl GitSignature {
    /// Create from git2 signature.
    pub fn from_git2(sig: &git2::Signature) -> Self {
        let when = chrono::DateTime::from_timestamp(sig.when().seconds(), 0)
            .unwrap_or_else(chrono::Utc::now);

        Self {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("unknown").to_string(),
            when,
        }
    }
}

/// Git commit information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommit {
    /// Commit OID.
    pub oid: GitOid,
    /// Commit message (first line).
    pub summary: String,
    /// Author signature.
    pub author: GitSignature,
    /// Parent commit OIDs.
    pub parents: Vec<GitOid>,
}

impl GitCommit {
    /// Create from git2 commit.
    pub fn from_git2(commit: &git2::Commit) -> Self {
        Self {
            oid: GitOid::from_git2(commit.id()),
            summary: commit.summary().unwrap_or("").to_string(),
            author: GitSignature::from_git2(&commit.author()),
            parents: commit.parent_ids().map(GitOid::from_git2).collect(),
        }
    }

    /// Check if this is the first commit of the branch.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Commit creation options.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Commit message.
    pub message: String,
    /// Author and committer (defaults to config).
    pub author: Option<(String, String)>,
    /// Allow empty commits.
    pub allow_empty: bool,
}

impl CommitOptions {
    /// Create with just a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set author.
    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author = Some((name.into(), email.into()));
        self
    }
}

impl GitRepository {
    /// Commit the current index on top of HEAD.
    pub fn commit(&self, options: &CommitOptions) -> GitResult<GitCommit> {
        if !options.allow_empty && !self.has_staged()? {
            return Err(GitError::NothingToCommit {
                path: self.root_path().display().to_string(),
            });
        }

        let commit = self.with_repo(|repo| -> GitResult<GitCommit> {
            let signature = match &options.author {
                Some((name, email)) => Signature::now(name, email)?,
                None => repo
                    .signature()
                    .or_else(|_| Signature::now(FALLBACK_AUTHOR.0, FALLBACK_AUTHOR.1))?,
            };

            let tree_id = repo.index()?.write_tree()?;
            let tree = repo.find_tree(tree_id)?;

            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit()?),
                Err(_) => None,
            };
            let parents: Vec<&git2::Commit> = parent.iter().collect();

            let oid = repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                &options.message,
                &tree,
                &parents,
            )?;
            Ok(GitCommit::from_git2(&repo.find_commit(oid)?))
        })?;

        info!(oid = %commit.oid.short(), summary = %commit.summary, "created commit");
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_commit_has_no_parent() {
        let dir = TempDir::new().unwrap();
        let repo = GitRepository::init(dir.path()).unwrap();
        fs::write(dir.path().join("index.js"), "// entry\n").unwrap();
        repo.stage_all().unwrap();

        let commit = repo
            .commit(&CommitOptions::with_message("magic react tricks!").author("Ada", "ada@example.com"))
            .unwrap();

        assert!(commit.is_root());
        assert_eq!(commit.summary, "magic react tricks!");
        assert_eq!(commit.author.name, "Ada");
        assert_eq!(repo.head_commit().unwrap(), Some(commit));
    }

    #[test]
    fn test_nothing_to_commit() {
        let dir = TempDir::new().unwrap();
        let repo = GitRepository::init(dir.path()).unwrap();

        let err = repo.commit(&CommitOptions::with_message("empty")).unwrap_err();
        assert!(err.is_nothing_to_commit());

        let options = CommitOptions {
            allow_empty: true,
            ..CommitOptions::with_message("empty").author("Ada", "ada@example.com")
        };
        assert!(repo.commit(&options).is_ok());
    }
}
