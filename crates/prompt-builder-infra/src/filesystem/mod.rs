//! Data directory layout.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PROMPT_BUILDER_DATA_DIR";

/// Resolve the data directory.
///
/// `PROMPT_BUILDER_DATA_DIR` if set, else `~/.prompt-builder`, else
/// `.prompt-builder` in the working directory.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".prompt-builder");
    }

    PathBuf::from(".prompt-builder")
}

/// Directory holding the local prompt store: `{data_dir}/store/`.
pub fn store_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("store")
}

/// SQLite URL for the shared prompt database: `{data_dir}/prompts.db`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("prompts.db").display())
}
