//! Configuration file management
//!
//! `CLIConfiguration` is read from `~/.diasys/config.toml`. A missing file
//! means defaults; every section and key is optional.
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "https://diasys-api.duckdns.org"
//!
//! [ui]
//! format = "text"   # text, json
//! color = true
//!
//! [logging]
//! level = "warn"    # error, warn, info, debug, trace
//! ```

use diasys_link::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CLIError, Result};
use crate::formatter::OutputFormat;

/// Default `--config` location; `~/` is expanded at load time
pub const DEFAULT_CONFIG_PATH: &str = "~/.diasys/config.toml";

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Server connection settings
    pub server: Option<ServerConfig>,

    /// UI preferences
    pub ui: Option<UIConfig>,

    /// Logging settings
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API base URL
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Output format: text, json
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level when neither RUST_LOG nor --verbose is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_color() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or(DEFAULT_CONFIG_PATH);
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let path = expand_config_path(path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            CLIError::ConfigurationError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Server URL, with precedence: explicit override > config file > default
    pub fn server_url(&self, override_url: Option<&str>) -> String {
        override_url
            .map(str::to_string)
            .or_else(|| self.server.as_ref().and_then(|s| s.url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn resolved_ui(&self) -> UIConfig {
        self.ui.clone().unwrap_or(UIConfig {
            format: default_format(),
            color: default_color(),
        })
    }

    /// Output format from the `[ui]` section; unknown values fall back to text
    pub fn output_format(&self) -> OutputFormat {
        match self.resolved_ui().format.trim().to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .map(|l| l.level.clone())
            .unwrap_or_else(default_log_level)
    }
}
