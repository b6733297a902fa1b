//! Environment variable handling.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Environment variable names.
pub mod vars {
    pub const MAGIC_REACT_CONFIG: &str = "MAGIC_REACT_CONFIG";
    pub const NODE_ENV: &str = "NODE_ENV";
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Load `.env`, `.env.local` and `.env.<NODE_ENV>` from `dir`, in that
/// order. Variables already set in the process are not overridden.
///
/// Returns the files that were loaded.
pub fn load_dotenv(dir: &Path) -> Result<Vec<PathBuf>, EnvError> {
    let mut candidates = vec![dir.join(".env"), dir.join(".env.local")];
    if let Ok(mode) = env::var(vars::NODE_ENV) {
        candidates.push(dir.join(format!(".env.{mode}")));
    }

    let mut loaded = Vec::new();
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        dotenvy::from_path(&path).map_err(|source| EnvError::Dotenv {
            path: path.clone(),
            source,
        })?;
        loaded.push(path);
    }
    Ok(loaded)
}

/// Get a boolean variable.
pub fn get_bool(var: &str) -> Option<bool> {
    env::var(var)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}
