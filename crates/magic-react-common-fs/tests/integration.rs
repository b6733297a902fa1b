use magic_react_common_fs as fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test]
async fn test_scaffold_cleanup_then_tracked_dirs() {
    let project = TempDir::new().unwrap();
    let src = project.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    for name in ["App.js", "App.test.js", "logo.svg", "index.js", "reportWebVitals.js"] {
        std::fs::write(src.join(name), "// scaffold").unwrap();
    }

    let removed = fs::remove_files_where(&src, |name| {
        name.starts_with("App.") || name.ends_with(".svg")
    })
    .await
    .unwrap();
    assert_eq!(removed.len(), 3);

    for dir in ["Assets/images", "Components/UIKit", "Data"] {
        let target = fs::path::safe_join(&src, dir).unwrap();
        fs::ensure_tracked_dir(&target).await.unwrap();
    }

    assert!(src.join("Assets/images/.gitkeep").exists());
    assert!(src.join("Data/.gitkeep").exists());
    assert!(src.join("index.js").exists());
}

#[tokio::test]
async fn test_errors_carry_the_offending_path() {
    let dir = TempDir::new().unwrap();
    let missing: PathBuf = dir.path().join("nope/routes.json");

    let err = fs::read_to_string(&missing, 1024).await.unwrap_err();
    assert_eq!(err.path(), missing.as_path());
    assert!(err.to_string().contains("routes.json"));
}

#[test]
fn test_unix_display_of_joined_paths() {
    let joined = fs::path::safe_join("src", "Views/Home").unwrap();
    assert_eq!(fs::path::to_unix_string(joined), "src/Views/Home");
    assert!(fs::path::safe_join("src", "../outside").is_none());
}
