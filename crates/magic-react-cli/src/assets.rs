//! Static files shipped inside the binary and copied into every project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use magic_react_routes::{ArtifactGroup, GeneratedArtifact};

macro_rules! asset {
    ($path:literal) => {
        ($path, include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/project/", $path)) as &'static [u8])
    };
}

/// Every embedded file, keyed by its path relative to the project root.
pub const PROJECT_FILES: &[(&str, &[u8])] = &[
    asset!("src/App.js"),
    asset!("src/Assets/logos/logo-black.svg"),
    asset!("src/Assets/logos/logo-compact.svg"),
    asset!("src/Components/UIKit/Navbar/Navbar.jsx"),
    asset!("src/Components/UIKit/Navbar/Navbar.module.css"),
    asset!("src/Components/UIKit/Sidebar/Sidebar.jsx"),
    asset!("src/Components/UIKit/Sidebar/Sidebar.module.css"),
    asset!("src/Data/config.js"),
    asset!("src/Hooks/useMediaQuery.js"),
    asset!("src/Utils/classNames.js"),
    asset!("src/Views/Generic/NotFoundView/NotFoundView.jsx"),
    asset!("src/Views/Generic/NotFoundView/NotFoundView.module.css"),
    asset!("src/Views/Generic/NotFoundView/index.jsx"),
];

/// The embedded files as one artifact group per directory.
///
/// Groups are independent of each other; each creates its own directory
/// chain before writing.
pub fn project_groups() -> Vec<ArtifactGroup> {
    let mut by_dir: BTreeMap<PathBuf, ArtifactGroup> = BTreeMap::new();

    for &(path, bytes) in PROJECT_FILES {
        let path = Path::new(path);
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        by_dir
            .entry(dir.clone())
            .or_insert_with(|| ArtifactGroup::new(dir))
            .artifacts
            .push(GeneratedArtifact::copied(path, bytes));
    }

    by_dir.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_react_routes::{write_groups, FsSink};

    #[test]
    fn test_groups_cover_every_file() {
        let groups = project_groups();
        let total: usize = groups.iter().map(ArtifactGroup::artifact_count).sum();
        assert_eq!(total, PROJECT_FILES.len());

        for group in &groups {
            for artifact in &group.artifacts {
                assert_eq!(artifact.path.parent(), Some(group.directory.as_path()));
            }
        }
    }

    #[test]
    fn test_app_imports_generated_routes() {
        let (_, app) = PROJECT_FILES
            .iter()
            .find(|(path, _)| *path == "src/App.js")
            .unwrap();
        let source = std::str::from_utf8(app).unwrap();
        assert!(source.contains("./Data/routes"));
    }

    #[tokio::test]
    async fn test_groups_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_groups(&FsSink, dir.path(), &project_groups()).await.unwrap();

        assert_eq!(written, PROJECT_FILES.len());
        assert!(dir.path().join("src/Components/UIKit/Sidebar/Sidebar.jsx").is_file());
        assert!(dir.path().join("src/Views/Generic/NotFoundView/index.jsx").is_file());
    }
}
