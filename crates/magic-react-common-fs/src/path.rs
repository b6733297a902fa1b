//! Path helpers for generated project trees.

use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base`, refusing absolute paths and `..` components.
pub fn safe_join(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));

    (!escapes).then(|| base.as_ref().join(path))
}

/// Render a relative path with forward slashes for display and for
/// comparisons in tests.
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
