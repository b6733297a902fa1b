//! Git integration for magic-react.
//!
//! Thin wrappers around git2 for the one thing the scaffolder needs: record
//! the generated project in a single commit.

#![warn(missing_docs)]

pub mod commit;
pub mod error;
pub mod oid;
pub mod repository;
pub mod staging;

pub use commit::{CommitOptions, GitCommit, GitSignature, FALLBACK_AUTHOR};
pub use error::{GitError, GitResult};
pub use oid::GitOid;
pub use repository::GitRepository;

// Re-export git2 for advanced usage
pub use git2;
