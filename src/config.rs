use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetchers::DEFAULT_USER_AGENT;

/// Settings for the binary and the builder defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-Agent header sent with page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// When set, recipe images are downloaded into this directory
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            image_dir: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ExtractorConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__IMAGE_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config("config")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from `file` (extension optional, may be missing)
/// overlaid with `RECIPE_EXTRACT__*` environment variables.
pub fn load_config(file: &str) -> Result<ExtractorConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
