//! Progress and summary output on stdout.

use std::fmt::Write as _;

use crossterm::style::Color;

use crate::output::color::{ColorMode, Styled};
use crate::pipeline::ScaffoldSummary;

const BANNER: &str = r"
                        _                                  _
  _ __ ___   __ _  __ _(_) ___       _ __ ___  __ _  ___| |_
 | '_ ` _ \ / _` |/ _` | |/ __|_____| '__/ _ \/ _` |/ __| __|
 | | | | | | (_| | (_| | | (_|_____| | |  __/ (_| | (__| |_
 |_| |_| |_|\__,_|\__, |_|\___|    |_|  \___|\__,_|\___|\__|
                  |___/
";

/// Writes pipeline progress for the operator.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(mode: ColorMode, quiet: bool) -> Self {
        Self {
            color: mode.stdout_enabled(),
            quiet,
        }
    }

    /// A printer that never writes, for tests.
    pub fn silent() -> Self {
        Self {
            color: false,
            quiet: true,
        }
    }

    fn styled(&self, text: impl Into<String>, color: Color) -> Styled {
        Styled::new(text).enabled(self.color).fg(color)
    }

    fn emit(&self, line: impl std::fmt::Display) {
        if !self.quiet {
            println!("{line}");
        }
    }

    pub fn banner(&self) {
        self.emit(self.styled(BANNER, Color::Cyan).bold());
        self.emit(format!("  v{}\n", env!("CARGO_PKG_VERSION")));
    }

    /// Announce a pipeline stage.
    pub fn step(&self, message: &str) {
        self.emit(format!("{} {message}", self.styled("›", Color::Cyan).bold()));
    }

    pub fn warning(&self, message: &str) {
        self.emit(self.styled(format!("warning: {message}"), Color::Yellow));
    }

    /// A line a tool wrote to its stdout.
    pub fn tool_output(&self, line: &str) {
        self.emit(self.styled(line, Color::Green));
    }

    /// A line a tool wrote to its stderr.
    pub fn tool_error(&self, line: &str) {
        if !self.quiet {
            eprintln!("{}", self.styled(line, Color::Red));
        }
    }

    pub fn summary(&self, summary: &ScaffoldSummary) {
        self.emit(self.format_summary(summary));
    }

    /// Render the closing report.
    pub fn format_summary(&self, summary: &ScaffoldSummary) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} {} ({} layouts, {} views, {} files)",
            self.styled("✔", Color::Green).bold(),
            summary.project_dir.display(),
            summary.layouts,
            summary.views,
            summary.files_written,
        );

        if !summary.links.is_empty() {
            let _ = writeln!(out, "\n{}", self.styled("Routes:", Color::Cyan).bold());
            for link in &summary.links {
                let _ = writeln!(out, "  {link}");
            }
        }

        if let Some(commit) = &summary.commit {
            let _ = writeln!(
                out,
                "\n{} {} {}",
                self.styled("Committed", Color::Cyan).bold(),
                commit.oid.short(),
                commit.summary
            );
        }

        out
    }
}
