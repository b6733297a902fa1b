//! Configuration file loading and parsing.

use crate::types::{ScaffoldConfig, ToolCommand};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the project-local configuration.
pub const CONFIG_DIR: &str = ".magic-react";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

const ENV_REFERENCE: &str = r"\$\{([^}:]+)(?::-([^}]*))?\}";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Expand `${VAR}` and `${VAR:-default}` references, resolving names
/// through `lookup`.
pub fn expand_env_vars(
    content: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let re = compile(ENV_REFERENCE)?;
    let mut result = String::with_capacity(content.len());
    let mut last = 0;

    for cap in re.captures_iter(content) {
        let Some(whole) = cap.get(0) else { continue };
        let var_name = &cap[1];

        let value = match lookup(var_name) {
            Some(v) => v,
            None => match cap.get(2) {
                Some(default) => default.as_str().to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result.push_str(&content[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }

    result.push_str(&content[last..]);
    Ok(result)
}

impl ScaffoldConfig {
    /// Parse a configuration document after environment expansion.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(content, |name| std::env::var(name).ok())?;
        let config: ScaffoldConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// The compiled cleanup pattern.
    pub fn cleanup_regex(&self) -> Result<Regex, ConfigError> {
        compile(&self.cleanup_pattern)
    }

    /// Check configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tools: [(&str, &ToolCommand); 3] = [
            ("bootstrap", &self.tools.bootstrap),
            ("install", &self.tools.install),
            ("format", &self.tools.format),
        ];
        for (name, tool) in tools {
            if tool.program.trim().is_empty() {
                return Err(invalid(format!("tools.{name}.program must not be empty")));
            }
        }

        self.cleanup_regex()?;

        for dir in &self.directories {
            if dir.trim().is_empty()
                || magic_react_common_fs::path::safe_join("", dir).is_none()
            {
                return Err(invalid(format!(
                    "directories entry `{dir}` must be a relative path inside src/"
                )));
            }
        }

        if self.icon_package.trim().is_empty() {
            return Err(invalid("icon_package must not be empty".to_string()));
        }

        if self.commit.message.trim().is_empty() {
            return Err(invalid("commit.message must not be empty".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError { message }
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the given working directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_dir.as_ref().to_path_buf(),
            file: None,
        }
    }

    /// Use an explicit configuration file instead of the project-local one.
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Path of the project-local configuration file.
    pub fn default_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load the configuration.
    ///
    /// An explicit file must exist. Without one, a missing project-local file
    /// yields the defaults.
    pub fn load(&self) -> Result<ScaffoldConfig, ConfigError> {
        let config_path = match &self.file {
            Some(file) => {
                let path = self.base_path.join(file);
                if !path.is_file() {
                    return Err(ConfigError::NotFound { path });
                }
                path
            }
            None => {
                let path = self.default_path();
                if !path.exists() {
                    return Ok(ScaffoldConfig::default());
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&config_path)?;
        ScaffoldConfig::from_yaml(&contents)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn write_local_config(dir: &Path, content: &str) {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config, ScaffoldConfig::default());
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_local_config(
            dir.path(),
            r#"
tools:
  format:
    program: npx
    args: [prettier, --write, src]
dependencies: [react-router-dom]
icon_package: react-icons/fa
commit:
  message: scaffolded
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();

        assert_eq!(config.tools.format.args, vec!["prettier", "--write", "src"]);
        assert_eq!(config.dependencies, vec!["react-router-dom"]);
        assert_eq!(config.icon_package, "react-icons/fa");
        assert_eq!(config.commit.message, "scaffolded");

        // Unspecified values keep their defaults
        assert_eq!(config.tools.bootstrap.program, "npx");
        assert_eq!(config.directories.len(), 11);
        assert_eq!(config.defaults.title, "Insert title");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::new(dir.path())
            .with_file(Some(PathBuf::from("missing.yaml")))
            .load();

        match result.unwrap_err() {
            ConfigError::NotFound { path } => assert!(path.ends_with("missing.yaml")),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_file_wins_over_local() {
        let dir = tempdir().unwrap();
        write_local_config(dir.path(), "icon_package: local\n");
        fs::write(dir.path().join("custom.yaml"), "icon_package: custom\n").unwrap();

        let config = ConfigLoader::new(dir.path())
            .with_file(Some(PathBuf::from("custom.yaml")))
            .load()
            .unwrap();
        assert_eq!(config.icon_package, "custom");
    }

    #[test]
    fn test_env_var_expansion() {
        let result = expand_env_vars("key: ${TEST_VAR}", lookup(&[("TEST_VAR", "test_value")])).unwrap();
        assert_eq!(result, "key: test_value");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${NONEXISTENT:-default}", lookup(&[])).unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        let result = expand_env_vars("key: ${MISSING_VAR}", lookup(&[]));
        match result.unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_env_vars_in_single_value() {
        let result = expand_env_vars(
            "message: ${PREFIX}-${SUFFIX} ${PREFIX}",
            lookup(&[("PREFIX", "magic"), ("SUFFIX", "react")]),
        )
        .unwrap();
        assert_eq!(result, "message: magic-react magic");
    }

    #[test]
    fn test_env_var_expansion_in_config() {
        std::env::set_var("MAGIC_REACT_TEST_AUTHOR", "Scaffold Bot");

        let dir = tempdir().unwrap();
        write_local_config(
            dir.path(),
            r#"
commit:
  author_name: ${MAGIC_REACT_TEST_AUTHOR}
  author_email: ${MAGIC_REACT_TEST_EMAIL:-bot@example.com}
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.commit.author_name.as_deref(), Some("Scaffold Bot"));
        assert_eq!(config.commit.author_email.as_deref(), Some("bot@example.com"));

        std::env::remove_var("MAGIC_REACT_TEST_AUTHOR");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ScaffoldConfig::default();
        config.tools.install.program = " ".to_string();
        match config.validate().unwrap_err() {
            ConfigError::ValidationError { message } => assert!(message.contains("tools.install")),
            other => panic!("Expected ValidationError, got {other:?}"),
        }

        let mut config = ScaffoldConfig::default();
        config.directories.push("../outside".to_string());
        match config.validate().unwrap_err() {
            ConfigError::ValidationError { message } => assert!(message.contains("../outside")),
            other => panic!("Expected ValidationError, got {other:?}"),
        }

        let mut config = ScaffoldConfig::default();
        config.cleanup_pattern = "(unclosed".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let dir = tempdir().unwrap();
        write_local_config(
            dir.path(),
            r#"
commit:
  message: ok
  author_name: [unclosed
"#,
        );

        match ConfigLoader::new(dir.path()).load().unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("Expected ParseError with line number, got {other:?}"),
        }
    }

    #[test]
    fn test_default_cleanup_pattern() {
        let re = ScaffoldConfig::default().cleanup_regex().unwrap();
        for name in ["App.js", "App.css", "App.test.js", "logo.svg"] {
            assert!(re.is_match(name), "{name} should be removed");
        }
        for name in ["index.js", "MyApp.js", "reportWebVitals.js", "setupTests.js"] {
            assert!(!re.is_match(name), "{name} should be kept");
        }
    }
}
