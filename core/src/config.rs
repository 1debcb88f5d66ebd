use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::repository::FileTaskRepository;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ENV_DATA_FILE: &str = "TASKMATE_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "TASKMATE_LOG";
const APP_DIR_NAME: &str = ".taskmate";
const DEFAULT_LOG_LEVEL: &str = "info";

/// User settings from `~/.taskmate/config.json`. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn app_dir() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(APP_DIR_NAME))
    }

    /// Loads the default config file, falling back to defaults when it does
    /// not exist.
    pub fn load() -> Result<Self> {
        let path = Self::app_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Applies `TASKMATE_DATA_FILE` and `TASKMATE_LOG` on top of the file
    /// values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env::var_os(ENV_DATA_FILE).filter(|v| !v.is_empty()) {
            self.data_file = Some(PathBuf::from(path));
        }
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            if !level.trim().is_empty() {
                self.log_level = Some(level);
            }
        }
        self
    }

    /// `cli_override` > config/env > `~/.taskmate/tasks.txt`
    pub fn resolve_data_file(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        match cli_override.or_else(|| self.data_file.clone()) {
            Some(path) => Ok(path),
            None => FileTaskRepository::default_path(),
        }
    }

    pub fn resolve_log_level(&self, cli_override: Option<String>) -> String {
        cli_override
            .or_else(|| self.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn resolve_log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::app_dir()?.join("logs")),
        }
    }
}
