//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the project name in tool arguments.
pub const PROJECT_PLACEHOLDER: &str = "{project}";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// External tools run by the pipeline.
    pub tools: ToolsConfig,
    /// Packages installed into the new project.
    pub dependencies: Vec<String>,
    /// Auxiliary directories created under `src/`.
    pub directories: Vec<String>,
    /// Files in `src/` matching this pattern are removed after bootstrap.
    pub cleanup_pattern: String,
    /// Package icon components are imported from.
    pub icon_package: String,
    /// Directory of Handlebars files replacing the built-in templates.
    pub templates: Option<PathBuf>,
    /// Attribute defaults for route nodes.
    pub defaults: DefaultsConfig,
    /// Version control settings.
    pub commit: CommitConfig,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            dependencies: [
                "react-router-dom",
                "react-icons",
                "@hybris-software/use-query",
                "@hybris-software/use-auth",
            ]
            .map(String::from)
            .to_vec(),
            directories: [
                "Assets/images",
                "Assets/icons",
                "Assets/logos",
                "Assets/videos",
                "Components/Advanced",
                "Components/UIKit",
                "Data",
                "Hooks",
                "Layouts",
                "Utils",
                "Views",
            ]
            .map(String::from)
            .to_vec(),
            cleanup_pattern: r"(^App[.])|([.]svg$)".to_string(),
            icon_package: "react-icons/ai".to_string(),
            templates: None,
            defaults: DefaultsConfig::default(),
            commit: CommitConfig::default(),
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments with the project placeholder substituted.
    pub fn resolved_args(&self, project: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(PROJECT_PLACEHOLDER, project))
            .collect()
    }
}

/// External tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Creates the project; runs in the parent directory.
    pub bootstrap: ToolCommand,
    /// Installs dependencies; runs in the project, `dependencies` appended.
    pub install: ToolCommand,
    /// Formats the generated sources; runs in the project.
    pub format: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bootstrap: ToolCommand::new("npx", ["create-react-app", PROJECT_PLACEHOLDER]),
            install: ToolCommand::new("npm", ["install"]),
            format: ToolCommand::new("npx", ["prettier", "--write", "."]),
        }
    }
}

/// Attribute defaults applied by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub title: String,
    pub icon: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: "Insert title".to_string(),
            icon: "AiFillHome".to_string(),
        }
    }
}

/// Commit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    pub message: String,
    /// Falls back to the repository's configured identity.
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            message: "magic react tricks!".to_string(),
            author_name: None,
            author_email: None,
        }
    }
}
