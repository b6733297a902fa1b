//! Git object ID wrapper.

use git2::Oid as Git2Oid;
use std::fmt;

/// Git object identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GitOid(Git2Oid);

impl GitOid {
    /// Create from git2 Oid.
    pub fn from_git2(oid: Git2Oid) -> Self {
        Self(oid)
    }

    /// Get the underlying git2 Oid.
    pub fn as_git2(&self) -> Git2Oid {
        self.0
    }

    /// Get as hex string.
    pub fn to_hex(&self) -> String {
        self.0.to_string()
    }

    /// Get short form (first 7 characters).
    pub fn short(&self) -> String {
        self.to_hex().chars().take(7).collect()
    }
}

impl fmt::Display for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GitOid({})", self.short())
    }
}
