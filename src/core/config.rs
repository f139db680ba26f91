//! Configuration: built-in defaults, then optional `config.json`, then environment.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::paths;
use crate::format::{FormatOptions, Formatter, HeadingStyle};

pub const HEADING_STYLE_VAR: &str = "MINIMIND_HEADING_STYLE";
pub const PROTECT_CODE_BLOCKS_VAR: &str = "MINIMIND_PROTECT_CODE_BLOCKS";
pub const CACHE_CAPACITY_VAR: &str = "MINIMIND_CACHE_CAPACITY";
pub const MAX_INPUT_BYTES_VAR: &str = "MINIMIND_MAX_INPUT_BYTES";
pub const CLASS_VAR: &str = "MINIMIND_CLASS";

const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub heading_style: HeadingStyle,
    pub protect_code_blocks: bool,
    /// Memoized answers kept by the formatter; 0 disables the cache.
    pub cache_capacity: usize,
    /// Inputs longer than this are truncated before formatting.
    pub max_input_bytes: usize,
    /// Extra class for the `formatted-text` container; no container when unset.
    pub class_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heading_style: HeadingStyle::default(),
            protect_code_blocks: false,
            cache_capacity: Formatter::DEFAULT_CACHE_CAPACITY,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            class_name: None,
        }
    }
}

impl Config {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            heading_style: self.heading_style,
            protect_code_blocks: self.protect_code_blocks,
        }
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::with_cache_capacity(self.format_options(), self.cache_capacity)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid {var}='{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Load configuration from the platform config file and the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(paths::config_file().as_deref(), |var| env::var(var).ok())
}

/// Load from an explicit file (absent file = defaults) and an env lookup.
pub fn load_from<F>(path: Option<&Path>, env_lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => read_file(p)?,
        None => Config::default(),
    };
    apply_env(&mut config, env_lookup)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    log::debug!("Loading config from {}", path.display());
    serde_json::from_str(&data).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env<F>(config: &mut Config, env_lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |var: &str| env_lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(value) = lookup(HEADING_STYLE_VAR) {
        config.heading_style = value
            .parse()
            .map_err(|reason| invalid(HEADING_STYLE_VAR, &value, reason))?;
    }
    if let Some(value) = lookup(PROTECT_CODE_BLOCKS_VAR) {
        config.protect_code_blocks = parse_bool(&value).ok_or_else(|| {
            invalid(
                PROTECT_CODE_BLOCKS_VAR,
                &value,
                "expected true/false".to_string(),
            )
        })?;
    }
    if let Some(value) = lookup(CACHE_CAPACITY_VAR) {
        config.cache_capacity = parse_usize(CACHE_CAPACITY_VAR, &value)?;
    }
    if let Some(value) = lookup(MAX_INPUT_BYTES_VAR) {
        config.max_input_bytes = parse_usize(MAX_INPUT_BYTES_VAR, &value)?;
    }
    if let Some(value) = lookup(CLASS_VAR) {
        config.class_name = Some(value.trim().to_string());
    }
    Ok(())
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_usize(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(var, value, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = load_from(None, env_of(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.heading_style, HeadingStyle::Legacy);
        assert!(!config.protect_code_blocks);
    }

    #[test]
    fn missing_file_is_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let config = load_from(Some(path.as_path()), env_of(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_values_are_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"heading_style": "standard", "protect_code_blocks": true, "class_name": "beginner"}"#,
        )
        .unwrap();
        let config = load_from(Some(path.as_path()), env_of(&[])).unwrap();
        assert_eq!(config.heading_style, HeadingStyle::Standard);
        assert!(config.protect_code_blocks);
        assert_eq!(config.class_name.as_deref(), Some("beginner"));
        assert_eq!(config.cache_capacity, Formatter::DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn env_overrides_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"heading_style": "standard"}"#).unwrap();
        let config = load_from(
            Some(path.as_path()),
            env_of(&[
                (HEADING_STYLE_VAR, "Legacy"),
                (CACHE_CAPACITY_VAR, "0"),
                (PROTECT_CODE_BLOCKS_VAR, "yes"),
            ]),
        )
        .unwrap();
        assert_eq!(config.heading_style, HeadingStyle::Legacy);
        assert_eq!(config.cache_capacity, 0);
        assert!(config.protect_code_blocks);
    }

    #[test]
    fn invalid_json_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_from(Some(path.as_path()), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn invalid_env_value_names_variable() {
        let err = load_from(None, env_of(&[(MAX_INPUT_BYTES_VAR, "lots")])).unwrap_err();
        match &err {
            ConfigError::InvalidValue { var, value, .. } => {
                assert_eq!(*var, MAX_INPUT_BYTES_VAR);
                assert_eq!(value, "lots");
            }
            _ => panic!("expected InvalidValue, got {:?}", err),
        }
    }

    #[test]
    fn unknown_heading_style_is_rejected() {
        let err = load_from(None, env_of(&[(HEADING_STYLE_VAR, "fancy")])).unwrap_err();
        assert!(err.to_string().contains("fancy"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = load_from(None, env_of(&[(CLASS_VAR, "  ")])).unwrap();
        assert_eq!(config.class_name, None);
    }
}
