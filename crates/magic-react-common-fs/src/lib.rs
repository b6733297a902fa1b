//! File system utilities for magic-react.
//!
//! All operations are async and run on the Tokio blocking pool. Each one is a
//! suspension point of the scaffolding pipeline.

pub mod path;

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::trace;

/// File system errors.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("file too large: {} ({size} bytes, max: {max})", path.display())]
    TooLarge { path: PathBuf, size: u64, max: usize },

    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn from_io(op: &'static str, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                op,
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Path the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::TooLarge { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;

/// Read a file to string with size limit.
pub async fn read_to_string(path: impl AsRef<Path>, max_size: usize) -> Result<String> {
    let path = path.as_ref();

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| FsError::from_io("read metadata of", path, e))?;

    if metadata.len() as usize > max_size {
        return Err(FsError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_size,
        });
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| FsError::from_io("read", path, e))
}

/// Whether `path` exists. Errors other than absence are reported.
pub async fn exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    fs::try_exists(path)
        .await
        .map_err(|e| FsError::from_io("inspect", path, e))
}

/// Ensure a directory and all of its parents exist.
pub async fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)
        .await
        .map_err(|e| FsError::from_io("create directory", path, e))?;
    trace!(path = %path.display(), "directory ready");
    Ok(())
}

/// Write `contents` to `path`, replacing any existing file.
///
/// The parent directory must already exist.
pub async fn write_file(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents)
        .await
        .map_err(|e| FsError::from_io("write", path, e))?;
    trace!(path = %path.display(), bytes = contents.len(), "file written");
    Ok(())
}

/// Create or truncate `path` to an empty file.
pub async fn touch(path: impl AsRef<Path>) -> Result<()> {
    write_file(path, &[]).await
}

/// Write `contents` to `path`, creating missing parent directories first.
pub async fn write_with_parents(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }
    write_file(path, contents).await
}

/// List regular files directly inside `dir`, sorted by name.
pub async fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| FsError::from_io("list", dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::from_io("list", dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| FsError::from_io("inspect", &entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Remove every regular file directly inside `dir` whose name satisfies
/// `matches`. Returns the removed paths.
pub async fn remove_files_where<F>(dir: impl AsRef<Path>, matches: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    let mut removed = Vec::new();
    for file in list_files(dir).await? {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !matches(name) {
            continue;
        }
        fs::remove_file(&file)
            .await
            .map_err(|e| FsError::from_io("remove", &file, e))?;
        trace!(path = %file.display(), "file removed");
        removed.push(file);
    }
    Ok(removed)
}

/// Ensure `dir` exists and holds at least one entry, adding an empty
/// `.gitkeep` when it is empty. Returns whether a placeholder was written.
pub async fn ensure_tracked_dir(dir: impl AsRef<Path>) -> Result<bool> {
    let dir = dir.as_ref();
    ensure_dir(dir).await?;

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| FsError::from_io("list", dir, e))?;
    let is_empty = entries
        .next_entry()
        .await
        .map_err(|e| FsError::from_io("list", dir, e))?
        .is_none();

    if is_empty {
        touch(dir.join(".gitkeep")).await?;
    }
    Ok(is_empty)
}
