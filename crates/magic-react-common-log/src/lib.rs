//! Logging infrastructure for magic-react.
//!
//! Logs go to stderr so they never interleave with the scaffolder's own
//! output or the output streamed from external tools.

use std::io;
use std::path::PathBuf;

use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Environment variable prefix shared by all logging settings.
pub const ENV_PREFIX: &str = "MAGIC_REACT_LOG";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Extra per-target directives (`RUST_LOG` syntax).
    pub directives: Option<String>,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include span events.
    pub span_events: bool,
    /// Colorize stderr output.
    pub ansi: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    Pretty,
    /// Compact single-line format.
    #[default]
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            directives: None,
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            span_events: false,
            ansi: true,
        }
    }
}

fn truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl LogConfig {
    /// Create config from environment variables.
    ///
    /// Reads `MAGIC_REACT_LOG_{LEVEL,FORMAT,FILE,SOURCE,SPANS}`. When no level
    /// is set, a plain level in `RUST_LOG` is used; any other `RUST_LOG` value
    /// is kept as filter directives.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`LogConfig::from_env`], reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let key = |suffix: &str| format!("{ENV_PREFIX}_{suffix}");

        if let Some(level) = var(&key("LEVEL")).and_then(|l| LogLevel::parse(&l)) {
            config.level = level;
        } else if let Some(rust_log) = var("RUST_LOG") {
            match LogLevel::parse(&rust_log) {
                Some(level) => config.level = level,
                None if !rust_log.trim().is_empty() => config.directives = Some(rust_log),
                None => {}
            }
        }

        if let Some(format) = var(&key("FORMAT")) {
            config.format = LogFormat::parse(&format);
        }

        if let Some(file_path) = var(&key("FILE")) {
            config.file_path = Some(PathBuf::from(file_path));
        }

        if let Some(source_location) = var(&key("SOURCE")) {
            config.source_location = truthy(&source_location);
        }

        if let Some(span_events) = var(&key("SPANS")) {
            config.span_events = truthy(&span_events);
        }

        config
    }

    /// Apply command-line verbosity: each `-v` lowers the threshold by one
    /// level starting from `info`, and `quiet` only keeps errors.
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        if quiet {
            self.level = LogLevel::Error;
        } else if verbose > 0 {
            self.level = match verbose {
                1 => LogLevel::Info,
                2 => LogLevel::Debug,
                _ => LogLevel::Trace,
            };
        }
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn filter(&self) -> Result<EnvFilter, LogError> {
        let spec = match &self.directives {
            Some(directives) => format!("{},{directives}", self.level.as_str()),
            None => self.level.as_str().to_string(),
        };
        EnvFilter::try_new(&spec).map_err(|e| LogError::InvalidFilter(format!("{spec}: {e}")))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn formatted<W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.span_events());

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Initialize logging with the given configuration.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = config.filter()?;

    let mut layers: Vec<BoxedLayer> = vec![formatted(&config, io::stderr, config.ansi)];

    if let Some(file_path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        layers.push(formatted(&config, std::sync::Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("invalid log filter {0}")]
    InvalidFilter(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

/// Span helpers for the scaffolding pipeline.
pub mod spans;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn test_log_level_from() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file_path.is_none());
        assert!(config.directives.is_none());
        assert!(!config.source_location);
        assert!(!config.span_events);
    }

    #[test]
    fn test_config_from_vars() {
        let config = LogConfig::from_vars(vars(&[
            ("MAGIC_REACT_LOG_LEVEL", "debug"),
            ("MAGIC_REACT_LOG_FORMAT", "json"),
            ("MAGIC_REACT_LOG_FILE", "/tmp/magic-react.log"),
            ("MAGIC_REACT_LOG_SOURCE", "true"),
            ("MAGIC_REACT_LOG_SPANS", "1"),
            ("RUST_LOG", "trace"),
        ]));

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/magic-react.log")));
        assert!(config.source_location);
        assert!(config.span_events);
    }

    #[test]
    fn test_rust_log_fallback() {
        let plain = LogConfig::from_vars(vars(&[("RUST_LOG", "info")]));
        assert_eq!(plain.level, LogLevel::Info);
        assert!(plain.directives.is_none());

        let targeted = LogConfig::from_vars(vars(&[("RUST_LOG", "magic_react_routes=trace")]));
        assert_eq!(targeted.level, LogLevel::Warn);
        assert_eq!(targeted.directives.as_deref(), Some("magic_react_routes=trace"));
        assert!(targeted.filter().is_ok());
    }

    #[test]
    fn test_verbosity_overrides_level() {
        let base = LogConfig::from_vars(vars(&[("MAGIC_REACT_LOG_LEVEL", "error")]));

        assert_eq!(base.clone().with_verbosity(0, false).level, LogLevel::Error);
        assert_eq!(base.clone().with_verbosity(1, false).level, LogLevel::Info);
        assert_eq!(base.clone().with_verbosity(2, false).level, LogLevel::Debug);
        assert_eq!(base.clone().with_verbosity(5, false).level, LogLevel::Trace);
        assert_eq!(base.with_verbosity(3, true).level, LogLevel::Error);
    }

    #[test]
    fn test_invalid_directives_are_reported() {
        let config = LogConfig {
            directives: Some("magic_react_routes=loud".to_string()),
            ..LogConfig::default()
        };
        assert!(matches!(config.filter(), Err(LogError::InvalidFilter(_))));
    }
}
