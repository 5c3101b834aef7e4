//! Configuration for the decoder and the terminal model

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_TAB_WIDTH;
use crate::parser::{DEFAULT_MAX_DATA, DEFAULT_MAX_PARAMS};

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen width in columns
    pub cols: usize,
    /// Screen height in rows
    pub rows: usize,
    /// Parameter slots of the parser context
    pub max_params: usize,
    /// String payload bytes kept per sequence
    pub max_data: usize,
    /// Distance between the initial tab stops
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            max_params: DEFAULT_MAX_PARAMS,
            max_data: DEFAULT_MAX_DATA,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration; absent fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("cols", self.cols),
            ("rows", self.rows),
            ("max_params", self.max_params),
            ("tab_width", self.tab_width),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::Invalid(format!("{name} must be non-zero"))),
            None => Ok(()),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
