use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the home directory holding converter state.
const CONFIG_DIR: &str = ".gpx2activity";
/// Default config file name for the RunKeeper upload target.
const CONFIG_FILE: &str = "runkeeper.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{0}' already exists")]
    AlreadyExists(PathBuf),
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("writing config failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Upload configuration, a `[temboo]` table in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub temboo: TembooConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TembooConfig {
    pub app_key_name: String,
    pub app_key_value: String,
    pub account_name: String,
    pub preset_name: String,
}

impl Config {
    /// Placeholder values the user has to replace before uploading.
    pub fn template() -> Self {
        Self {
            temboo: TembooConfig {
                app_key_name: "APP_KEY_NAME".to_string(),
                app_key_value: "APP_KEY_VALUE".to_string(),
                account_name: "ACCOUNT_NAME".to_string(),
                preset_name: "PRESET_NAME".to_string(),
            },
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Write a placeholder config, creating the parent directory if needed.
    /// Refuses to touch an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(&Self::template())?)?;
        Ok(())
    }

    /// `~/.gpx2activity/runkeeper.toml`, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}
