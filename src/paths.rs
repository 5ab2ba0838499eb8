//! Centralized path utilities for the console.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const DIR_NAME: &str = "Volkanic Console";
const CONFIG_FILE_NAME: &str = "console.toml";

/// Per-user config directory (e.g. ~/.config/Volkanic Console).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(DIR_NAME))
        .ok_or_else(|| AppError::config("Cannot determine config directory"))
}

/// Get the path to the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Ensure the directory that will hold `file` exists and is a directory.
pub fn ensure_parent_dir(file: &Path) -> Result<()> {
    let Some(dir) = file.parent() else {
        return Ok(());
    };
    if dir.is_file() {
        return Err(AppError::io(format!(
            "Expected directory, found file: {}",
            dir.display()
        )));
    }
    fs::create_dir_all(dir).map_err(|e| AppError::io(e.to_string()))
}
