//! Git error types.

use thiserror::Error;

/// Git operation error.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// Directory that was opened.
        path: String,
    },

    /// The index matches HEAD.
    #[error("nothing to commit in {path}")]
    NothingToCommit {
        /// Repository working directory.
        path: String,
    },

    /// Invalid operation.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// What went wrong.
        message: String,
    },

    /// Git2 library error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Result type for Git operations.
pub type GitResult<T> = Result<T, GitError>;

impl GitError {
    /// Check if the repository simply had no changes.
    pub fn is_nothing_to_commit(&self) -> bool {
        matches!(self, Self::NothingToCommit { .. })
    }
}
