//! Terminal output: colors and the progress printer.

pub mod color;
pub mod printer;

pub use color::{ColorMode, Styled};
pub use printer::Printer;
