//! Configuration for the magic-react scaffolder.
//!
//! Settings are read from `.magic-react/config.yaml` (or an explicit file).
//! Every field is optional; missing values fall back to the defaults the
//! scaffolder has always used.

pub mod types;
pub mod loader;
pub mod env;


pub use types::*;
pub use loader::*;
pub use env::*;
