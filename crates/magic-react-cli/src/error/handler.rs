//! Error handling utilities.

use std::panic;
use std::process::ExitCode;

use crate::error::{CliError, ErrorFormatter};
use crate::output::color::ColorMode;

/// Set up panic handler for user-friendly panic messages
pub fn setup_panic_handler() {
    panic::set_hook(Box::new(|panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        eprintln!("\n\x1b[31mInternal error:\x1b[0m {message}");
        eprintln!("\nThis is a bug in magic-react. The project directory may be incomplete.");
        eprintln!("\nLocation: {location}");

        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("\nBacktrace:");
            eprintln!("{:?}", std::backtrace::Backtrace::capture());
        } else {
            eprintln!("\nSet RUST_BACKTRACE=1 for a backtrace.");
        }
    }));
}

/// Handle a result and exit appropriately
pub fn handle_result<T>(result: Result<T, CliError>, color_mode: ColorMode, verbose: bool) -> ExitCode {
    ExitCode::from(report(result, color_mode, verbose))
}

/// Print the error, if any, and return the process exit status.
fn report<T>(result: Result<T, CliError>, color_mode: ColorMode, verbose: bool) -> u8 {
    match result {
        Ok(_) => 0,
        Err(error) => {
            tracing::debug!(code = error.code(), "run failed");
            ErrorFormatter::new()
                .color_mode(color_mode)
                .verbose(verbose)
                .print(&error);
            error.exit_status()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_result_success() {
        let result: Result<(), CliError> = Ok(());
        assert_eq!(report(result, ColorMode::Never, false), 0);
    }

    #[test]
    fn test_handle_result_error() {
        let result: Result<(), CliError> = Err(CliError::user("test error"));
        assert_eq!(report(result, ColorMode::Never, false), 255);
    }
}
