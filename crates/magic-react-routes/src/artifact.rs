//! Generated artifacts and the ordered, concurrent writer that persists them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use magic_react_common_fs::{self as fs, FsError};
use tracing::debug;

/// What to write at an artifact's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    /// Rendered template output.
    Rendered(String),
    /// Embedded bytes copied verbatim.
    Copied(&'static [u8]),
    /// Zero-length file.
    Empty,
}

impl ArtifactContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Rendered(text) => text.as_bytes(),
            Self::Copied(bytes) => bytes,
            Self::Empty => &[],
        }
    }
}

/// A single file to generate, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub content: ArtifactContent,
}

impl GeneratedArtifact {
    pub fn rendered(path: impl Into<PathBuf>, text: String) -> Self {
        Self {
            path: path.into(),
            content: ArtifactContent::Rendered(text),
        }
    }

    pub fn copied(path: impl Into<PathBuf>, bytes: &'static [u8]) -> Self {
        Self {
            path: path.into(),
            content: ArtifactContent::Copied(bytes),
        }
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: ArtifactContent::Empty,
        }
    }
}

/// A directory, the files directly inside it, and groups that may only be
/// written once this group is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactGroup {
    pub directory: PathBuf,
    pub artifacts: Vec<GeneratedArtifact>,
    pub nested: Vec<ArtifactGroup>,
}

impl ArtifactGroup {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Number of files in this group and every nested group.
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len() + self.nested.iter().map(Self::artifact_count).sum::<usize>()
    }

    /// Every artifact in emission order: own files first, then nested groups.
    pub fn artifacts(&self) -> Vec<&GeneratedArtifact> {
        let mut out: Vec<&GeneratedArtifact> = self.artifacts.iter().collect();
        for group in &self.nested {
            out.extend(group.artifacts());
        }
        out
    }
}

/// Destination for generated artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn create_dir(&self, path: &Path) -> Result<(), FsError>;

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FsError>;
}

/// Writes artifacts to the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

#[async_trait]
impl ArtifactSink for FsSink {
    async fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        fs::ensure_dir(path).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        fs::write_file(path, contents).await
    }
}

/// Write `group` under `root` and return the number of files written.
///
/// The group's directory is created before any of its files are written, and
/// nested groups start only after the enclosing group is finished. Nested
/// groups are written concurrently with each other.
pub fn write_group<'a, S>(
    sink: &'a S,
    root: &'a Path,
    group: &'a ArtifactGroup,
) -> BoxFuture<'a, Result<usize, FsError>>
where
    S: ArtifactSink + ?Sized,
{
    async move {
        sink.create_dir(&root.join(&group.directory)).await?;

        for artifact in &group.artifacts {
            sink.write_file(&root.join(&artifact.path), artifact.content.as_bytes())
                .await?;
        }
        debug!(
            directory = %group.directory.display(),
            files = group.artifacts.len(),
            "group written"
        );

        let nested = try_join_all(group.nested.iter().map(|child| write_group(sink, root, child))).await?;
        Ok(group.artifacts.len() + nested.into_iter().sum::<usize>())
    }
    .boxed()
}

/// Write several independent groups concurrently.
pub async fn write_groups<S>(sink: &S, root: &Path, groups: &[ArtifactGroup]) -> Result<usize, FsError>
where
    S: ArtifactSink + ?Sized,
{
    let counts = try_join_all(groups.iter().map(|group| write_group(sink, root, group))).await?;
    Ok(counts.into_iter().sum())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Event recorded by [`RecordingSink`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkEvent {
        Dir(PathBuf),
        File(PathBuf, Vec<u8>),
    }

    /// In-memory sink that records the order of operations.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<SinkEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ArtifactSink for RecordingSink {
        async fn create_dir(&self, path: &Path) -> Result<(), FsError> {
            tokio::task::yield_now().await;
            self.events.lock().unwrap().push(SinkEvent::Dir(path.to_path_buf()));
            Ok(())
        }

        async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
            tokio::task::yield_now().await;
            self.events
                .lock()
                .unwrap()
                .push(SinkEvent::File(path.to_path_buf(), contents.to_vec()));
            Ok(())
        }
    }

    /// Assert every file event comes after the creation of its directory.
    pub fn assert_dirs_precede_files(events: &[SinkEvent]) {
        for (index, event) in events.iter().enumerate() {
            if let SinkEvent::File(path, _) = event {
                let parent = path.parent().unwrap();
                let created = events[..index]
                    .iter()
                    .any(|e| matches!(e, SinkEvent::Dir(dir) if dir == parent));
                assert!(created, "{} written before its directory", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ArtifactGroup {
        let mut parent = ArtifactGroup::new("Views/Home/AView");
        parent.artifacts.push(GeneratedArtifact::rendered("Views/Home/AView/AView.jsx", "a".into()));
        parent.artifacts.push(GeneratedArtifact::empty("Views/Home/AView/AView.module.css"));

        for name in ["BView", "CView"] {
            let mut child = ArtifactGroup::new(format!("Views/Home/{name}"));
            child
                .artifacts
                .push(GeneratedArtifact::copied(format!("Views/Home/{name}/{name}.jsx"), b"x"));
            parent.nested.push(child);
        }
        parent
    }

    #[test]
    fn test_counts_and_order() {
        let group = sample();
        assert_eq!(group.artifact_count(), 4);

        let paths: Vec<_> = group.artifacts().iter().map(|a| a.path.clone()).collect();
        assert_eq!(paths[0], PathBuf::from("Views/Home/AView/AView.jsx"));
        assert_eq!(paths[3], PathBuf::from("Views/Home/CView/CView.jsx"));
    }

    #[tokio::test]
    async fn test_directory_precedes_files_under_concurrency() {
        let sink = RecordingSink::default();
        let groups = vec![sample(), ArtifactGroup::new("Layouts/HomeLayout")];

        let written = write_groups(&sink, Path::new("/project"), &groups).await.unwrap();
        assert_eq!(written, 4);

        let events = sink.events();
        assert_dirs_precede_files(&events);

        // The parent group finishes before its nested groups begin.
        let parent_file = events
            .iter()
            .position(|e| matches!(e, SinkEvent::File(p, _) if p.ends_with("AView.module.css")))
            .unwrap();
        let child_dir = events
            .iter()
            .position(|e| matches!(e, SinkEvent::Dir(p) if p.ends_with("BView")))
            .unwrap();
        assert!(parent_file < child_dir);
    }

    #[tokio::test]
    async fn test_fs_sink_writes_tree() {
        let dir = TempDir::new().unwrap();

        let written = write_group(&FsSink, dir.path(), &sample()).await.unwrap();
        assert_eq!(written, 4);

        let root = dir.path().join("Views/Home");
        assert_eq!(std::fs::read_to_string(root.join("AView/AView.jsx")).unwrap(), "a");
        assert_eq!(std::fs::metadata(root.join("AView/AView.module.css")).unwrap().len(), 0);
        assert_eq!(std::fs::read(root.join("CView/CView.jsx")).unwrap(), b"x");
    }
}
