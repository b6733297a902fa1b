//! magic-react CLI library
//!
//! Argument parsing, the scaffolding pipeline and operator output for the
//! `magic-react` binary.

pub mod assets;
pub mod cli;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod tools;

pub use error::CliError;
