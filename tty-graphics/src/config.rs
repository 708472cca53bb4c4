// ABOUTME: Configuration file loading, validation, and hierarchical merging
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::codec::ResizeFilter;
use crate::command::Medium;
use crate::constants::{env::CONFIG_DIR_NAME, quiet};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub medium: Option<Medium>,
    #[serde(default, deserialize_with = "validate_quiet")]
    pub quiet: Option<u8>,
    #[serde(default)]
    pub filter: Option<ResizeFilter>,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        Self::load_from_paths(&Self::get_config_paths())
    }

    /// Load configuration from file paths in order; later files override earlier ones.
    /// Missing files are skipped, unreadable or invalid ones are errors.
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !path.is_file() {
                continue;
            }
            log::debug!("Loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(CONFIG_DIR_NAME)
                .join("config.toml");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            medium: other.medium.or(self.medium),
            quiet: other.quiet.or(self.quiet),
            filter: other.filter.or(self.filter),
            temp_dir: other.temp_dir.or(self.temp_dir),
        }
    }

    pub fn medium(&self) -> Medium {
        self.medium.unwrap_or_default()
    }

    pub fn quiet(&self) -> u8 {
        self.quiet.unwrap_or(quiet::SILENT)
    }

    pub fn filter(&self) -> ResizeFilter {
        self.filter.unwrap_or_default()
    }
}

fn validate_quiet<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<u8>::deserialize(deserializer)?;
    match value {
        Some(level) if level > quiet::SILENT => Err(D::Error::custom(format!(
            "Invalid quiet level {}. Must be 0, 1 or 2",
            level
        ))),
        _ => Ok(value),
    }
}
