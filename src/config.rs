//! Configuration for the background version check.

use crate::error::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default version check endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.trivy.cloud/check";

/// Environment variable that overrides [`UpdateConfig::endpoint`].
pub const ENDPOINT_ENV: &str = "TRIVY_UPDATE_ENDPOINT";

/// Settings for [`UpdateChecker`](crate::update::UpdateChecker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// URL the check request is sent to.
    pub endpoint: String,
    /// Upper bound on the whole request, including body read.
    pub timeout_secs: u64,
    /// Never contact the endpoint. Notices stay empty.
    pub skip_version_check: bool,
    /// Send only the `User-Agent` header; omit identifier, command, OS and arch.
    pub disable_telemetry: bool,
}

fn default_timeout_secs() -> u64 {
    3
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: default_timeout_secs(),
            skip_version_check: false,
            disable_telemetry: false,
        }
    }
}

impl UpdateConfig {
    /// Default settings with the endpoint taken from `TRIVY_UPDATE_ENDPOINT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| UpdateError::Config(e.to_string()))?;
        config.apply_env();
        Ok(config)
    }

    /// Load `path` if given, else the file at [`default_config_path`] if it
    /// exists, else defaults with environment overrides.
    ///
    /// [`default_config_path`]: Self::default_config_path
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_default(path, &Self::default_config_path())
    }

    fn load_with_default(path: Option<&Path>, default_path: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if default_path.is_file() => Self::from_file(default_path),
            None => Ok(Self::from_env()),
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| UpdateError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path, e.g. `~/.config/trivy/update.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("trivy")
            .join("update.toml")
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable or disable the check entirely.
    pub fn with_skip_version_check(mut self, skip: bool) -> Self {
        self.skip_version_check = skip;
        self
    }

    /// Enable or disable the identifying request headers.
    pub fn with_disable_telemetry(mut self, disable: bool) -> Self {
        self.disable_telemetry = disable;
        self
    }

    fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV)
            && !endpoint.trim().is_empty()
        {
            self.endpoint = endpoint;
        }
    }
}
