//! Centralized path helpers for the config directory.

use std::path::PathBuf;

use crate::core::app;

/// Overrides the config directory (tests, sandboxed runs).
pub const CONFIG_DIR_VAR: &str = "MINIMIND_CONFIG_DIR";

/// Project directories from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/minimind-format/), or `MINIMIND_CONFIG_DIR` when set.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_VAR)
        && !dir.trim().is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Path of the optional `config.json`.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.json"))
}
