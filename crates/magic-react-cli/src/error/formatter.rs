//! Error formatting for CLI output.

use std::fmt::Write as FmtWrite;

use crossterm::style::Color;

use crate::error::CliError;
use crate::output::color::{ColorMode, Styled};

/// Error output formatter
pub struct ErrorFormatter {
    color: bool,
    verbose: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self {
            color: ColorMode::Auto.stderr_enabled(),
            verbose: false,
        }
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color = mode.stderr_enabled();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn label(&self, text: &str, color: Color) -> Styled {
        Styled::new(text).enabled(self.color).fg(color).bold()
    }

    /// Format and print an error
    pub fn print(&self, error: &CliError) {
        let formatted = self.format(error);
        eprint!("{formatted}");
    }

    /// Format an error to a string
    pub fn format(&self, error: &CliError) -> String {
        let mut output = String::new();

        let error_prefix = self.label(&format!("error[{}]:", error.code()), Color::Red);
        let _ = writeln!(output, "{error_prefix} {error}");

        self.format_violations(&mut output, error);

        if self.verbose {
            self.format_source_chain(&mut output, error);
        }

        self.format_context(&mut output, error);

        if let Some(hint) = error.hint() {
            let hint_label = self.label("hint:", Color::Cyan);
            let _ = writeln!(output, "\n{hint_label} {hint}");
        }

        let suggestions = error.suggestions();
        if !suggestions.is_empty() {
            let suggest_label = self.label("suggestions:", Color::Yellow);
            let _ = writeln!(output, "\n{suggest_label}");

            for suggestion in suggestions {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }

        output
    }

    fn format_violations(&self, output: &mut String, error: &CliError) {
        for violation in error.violations() {
            let location = Styled::new(violation.location.as_str())
                .enabled(self.color)
                .fg(Color::Yellow);
            let _ = writeln!(output, "  - {location}: {}", violation.message);
        }
    }

    fn format_source_chain(&self, output: &mut String, error: &CliError) {
        use std::error::Error;

        let Some(source) = error.source() else {
            return;
        };

        let caused_label = Styled::new("caused by:")
            .enabled(self.color)
            .fg(Color::DarkGrey);
        let _ = writeln!(output, "\n{caused_label}");
        let _ = writeln!(output, "  {source}");

        let mut current = source.source();
        let mut depth = 1;
        while let Some(src) = current {
            let _ = writeln!(output, "  {depth}: {src}");
            current = src.source();
            depth += 1;
        }
    }

    fn format_context(&self, output: &mut String, error: &CliError) {
        let grey = |text: &str| Styled::new(text).enabled(self.color).fg(Color::DarkGrey);

        match error {
            CliError::Io { path: Some(p), .. } => {
                let _ = writeln!(output, "\n  {} {}", grey("path:"), p.display());
            }
            CliError::Tool { tool, .. } => {
                let _ = writeln!(output, "\n  {} {tool}", grey("stage:"));
            }
            CliError::NotFound {
                resource_type,
                resource_name,
                ..
            } => {
                let _ = writeln!(output, "\n  {} {resource_type} {resource_name}", grey("missing:"));
            }
            _ => {}
        }
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_react_routes::Violation;

    fn plain() -> ErrorFormatter {
        ErrorFormatter::new().color_mode(ColorMode::Never)
    }

    #[test]
    fn test_error_formatter() {
        let error = CliError::user("Directory \"shop\" already exists");
        let output = plain().format(&error);

        assert!(output.contains("error[E010]:"));
        assert!(output.contains("Directory \"shop\" already exists"));
    }

    #[test]
    fn test_error_with_hint() {
        let error = CliError::user_with_hint("Directory exists", "Pass --skip-creation");
        let output = plain().format(&error);

        assert!(output.contains("hint:"));
        assert!(output.contains("Pass --skip-creation"));
    }

    #[test]
    fn test_violations_are_listed() {
        let error = CliError::Spec {
            message: "Invalid routes file".to_string(),
            violations: vec![Violation {
                location: "home.routes.x-y".to_string(),
                message: "key `x-y` is not a valid identifier fragment".to_string(),
            }],
            hint: None,
        };
        let output = plain().format(&error);

        assert!(output.contains("  - home.routes.x-y: key `x-y` is not a valid identifier fragment"));
    }

    #[test]
    fn test_error_with_suggestions() {
        let error = CliError::not_found_with_suggestions(
            "routes file",
            "route.json",
            vec!["routes.json".to_string()],
        );
        let output = plain().format(&error);

        assert!(output.contains("suggestions:"));
        assert!(output.contains("- routes.json"));
    }

    #[test]
    fn test_verbose_mode() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = CliError::from(io_error);
        let output = plain().verbose(true).format(&error);

        assert!(output.contains("caused by:"));
        assert!(output.contains("disk full"));
    }
}
