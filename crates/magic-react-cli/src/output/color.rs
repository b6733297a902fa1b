//! Color selection and styled text.

use std::fmt;
use std::io::{self, IsTerminal};

use clap::ColorChoice;
use crossterm::style::{Color, Stylize};

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

impl ColorMode {
    fn resolve(self, is_tty: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_tty && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn stdout_enabled(self) -> bool {
        self.resolve(io::stdout().is_terminal())
    }

    pub fn stderr_enabled(self) -> bool {
        self.resolve(io::stderr().is_terminal())
    }
}

/// Text with an optional color and weight, rendered plain when colors are off.
#[derive(Debug, Clone)]
pub struct Styled {
    text: String,
    enabled: bool,
    fg: Option<Color>,
    bold: bool,
}

impl Styled {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: true,
            fg: None,
            bold: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl fmt::Display for Styled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return f.write_str(&self.text);
        }

        let mut content = self.text.clone().stylize();
        if let Some(color) = self.fg {
            content = content.with(color);
        }
        if self.bold {
            content = content.bold();
        }
        write!(f, "{content}")
    }
}
