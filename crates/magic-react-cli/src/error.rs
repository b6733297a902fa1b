//! CLI error handling and formatting.

use std::io;
use std::path::PathBuf;

use magic_react_common_config::{ConfigError, EnvError};
use magic_react_common_fs::FsError;
use magic_react_common_log::LogError;
use magic_react_git::GitError;
use magic_react_routes::{RenderError, SchemaError, Violation};
use thiserror::Error;

use crate::tools::ToolError;

pub mod formatter;
pub mod handler;

pub use formatter::ErrorFormatter;
pub use handler::{handle_result, setup_panic_handler};

/// Process exit status for every failure.
pub const EXIT_FAILURE: u8 = 255;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// CLI error type with rich context
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Option<BoxedSource>,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
        suggestions: Vec<String>,
    },

    #[error("{message}")]
    Spec {
        message: String,
        violations: Vec<Violation>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Tool {
        message: String,
        tool: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{message}")]
    Render {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{message}")]
    Git {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::NotFound { .. } => "E003",
            Self::Spec { .. } => "E004",
            Self::Tool { .. } => "E005",
            Self::Render { .. } => "E006",
            Self::Git { .. } => "E007",
            Self::User { .. } => "E010",
            Self::Other(_) => "E999",
        }
    }

    /// Process exit status for this error
    pub fn exit_status(&self) -> u8 {
        EXIT_FAILURE
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Spec { hint, .. } | Self::User { hint, .. } => {
                hint.as_deref()
            }
            Self::NotFound { suggestions, .. } if !suggestions.is_empty() => {
                Some("See suggestions below")
            }
            _ => None,
        }
    }

    /// Get suggestions for this error
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Specification violations carried by this error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Spec { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
            suggestions: vec![],
        }
    }

    /// Create a not found error with suggestions
    pub fn not_found_with_suggestions(
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        match Self::not_found(resource_type, resource_name) {
            Self::NotFound {
                message,
                resource_type,
                resource_name,
                ..
            } => Self::NotFound {
                message,
                resource_type,
                resource_name,
                suggestions,
            },
            other => other,
        }
    }

    /// Create a user error (user did something wrong)
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a user error with hint
    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

// Conversion implementations
impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(Box::new(err)),
            path: None,
        }
    }
}

impl From<FsError> for CliError {
    fn from(err: FsError) -> Self {
        Self::Io {
            message: err.to_string(),
            path: Some(err.path().to_path_buf()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check .magic-react/config.yaml or the file passed with --config".to_string()),
        }
    }
}

impl From<EnvError> for CliError {
    fn from(err: EnvError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
            hint: Some("Each .env line must look like NAME=value".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: format!("Logging setup failed: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check RUST_LOG and the MAGIC_REACT_LOG_* variables".to_string()),
        }
    }
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Read {
                path,
                source: FsError::NotFound { .. },
            } => Self::not_found("routes file", path.display().to_string()),
            SchemaError::Read { source, .. } => source.into(),
            SchemaError::Parse { .. } => Self::Spec {
                message: err.to_string(),
                violations: Vec::new(),
                hint: Some(
                    "The routes file must hold a single object keyed by layout name".to_string(),
                ),
            },
            SchemaError::Invalid { violations } => Self::Spec {
                message: "Invalid routes file".to_string(),
                violations,
                hint: Some("Fix the keys listed above and run again".to_string()),
            },
        }
    }
}

impl From<RenderError> for CliError {
    fn from(err: RenderError) -> Self {
        Self::Render {
            message: format!("Template error: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<GitError> for CliError {
    fn from(err: GitError) -> Self {
        Self::Git {
            message: format!("Commit failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<ToolError> for CliError {
    fn from(err: ToolError) -> Self {
        Self::Tool {
            message: err.to_string(),
            tool: err.tool().to_string(),
            source: Some(Box::new(err)),
        }
    }
}
