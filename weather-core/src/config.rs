use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable overriding the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
/// Environment variable overriding the stored base address.
pub const BASE_ADDRESS_ENV: &str = "WEATHER_BASE_ADDRESS";

/// Raw configuration stored on disk.
///
/// Values are not validated here; `WeatherProvider::from_config` does that
/// and captures failures as an unavailable provider.
///
/// Example TOML:
/// api_key = "..."
/// base_address = "https://api.openweathermap.org/data/2.5/"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Optional override of the default endpoint.
    pub base_address: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-now", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHER_API_KEY` / `WEATHER_BASE_ADDRESS` on top of stored values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(BASE_ADDRESS_ENV).ok(),
        )
    }

    /// Replace stored values with any override that is present.
    pub fn with_overrides(mut self, api_key: Option<String>, base_address: Option<String>) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if base_address.is_some() {
            self.base_address = base_address;
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}
