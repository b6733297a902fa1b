//! Test utilities for magic-react crates.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Writes `spec` as pretty JSON to `<dir>/<name>` and returns the path.
pub fn write_spec(dir: &Path, name: &str, spec: &Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(spec).expect("Failed to serialize spec");
    std::fs::write(&path, text).expect("Failed to write spec");
    path
}

/// Lays out what a freshly bootstrapped React project looks like, so the
/// pipeline can run with bootstrapping skipped.
pub fn bootstrapped_project(root: &Path) {
    let src = root.join("src");
    std::fs::create_dir_all(&src).expect("Failed to create src");
    for (name, content) in [
        ("App.js", "export default function App() {}\n"),
        ("App.css", ".App {}\n"),
        ("App.test.js", "test('renders', () => {});\n"),
        ("logo.svg", "<svg />\n"),
        ("index.js", "import App from './App';\n"),
    ] {
        std::fs::write(src.join(name), content).expect("Failed to write scaffold file");
    }
    std::fs::write(root.join("package.json"), "{ \"name\": \"app\" }\n")
        .expect("Failed to write package.json");
}

/// Specification fixtures.
pub mod fixtures {
    use super::*;

    /// One plain layout at `/` hosting a single view.
    pub fn single_layout() -> Value {
        json!({
            "home": {
                "path": "/",
                "routes": { "dashboard": { "path": "/dashboard" } }
            }
        })
    }

    /// A sidebar layout with a nested container view.
    pub fn sidebar_layout() -> Value {
        json!({
            "admin": {
                "path": "/admin",
                "title": "Admin",
                "sidebar": true,
                "routes": {
                    "users": {
                        "path": "/users",
                        "title": "Users",
                        "icon": "AiOutlineUser",
                        "routes": { "detail": { "path": "/detail", "title": "Detail" } }
                    },
                    "overview": { "path": "/overview", "title": "Overview", "sitemap": true }
                }
            }
        })
    }

    /// Two layouts each owning a view keyed `list`.
    pub fn shared_view_keys() -> Value {
        json!({
            "home": { "path": "/", "routes": { "list": { "path": "/list" } } },
            "admin": { "path": "/admin", "routes": { "list": { "path": "/list" } } }
        })
    }

    /// A view whose `routes` is not a mapping.
    pub fn invalid_children() -> Value {
        json!({
            "home": {
                "path": "/",
                "routes": { "dashboard": { "path": "/dashboard", "routes": ["oops"] } }
            }
        })
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
