//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

/// Test context with temporary working directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Write a routes file into the working directory
    pub fn with_spec(self, name: &str, spec: &Value) -> Self {
        magic_react_test_utils::write_spec(self.path(), name, spec);
        self
    }

    /// Write `.magic-react/config.yaml`
    pub fn with_config(self, config: &str) -> Self {
        let dir = self.path().join(".magic-react");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.yaml"), config).expect("Failed to write config");
        self
    }

    /// Lay out an already bootstrapped project named `name`
    pub fn with_project(self, name: &str) -> Self {
        magic_react_test_utils::bootstrapped_project(&self.path().join(name));
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn project_src(&self, name: &str) -> PathBuf {
        self.path().join(name).join("src")
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("magic-react").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("MAGIC_REACT_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1"); // Disable colors for predictable output
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
