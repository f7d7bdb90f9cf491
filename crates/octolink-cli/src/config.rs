//! Project configuration support for .octolink.yaml files.
//!
//! This module discovers and parses `.octolink.yaml` files in project
//! directories. These files hold defaults for the API base address, the
//! OAuth app and the HTTP client.

use anyhow::{bail, Context, Result};
use octolink_github::ConnectionConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = ".octolink.yaml";

/// Project configuration from .octolink.yaml file
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// API base address, e.g. `https://ghe.example.com/api/v3`
    pub base_url: Option<String>,
    /// OAuth app client id
    pub client_id: Option<String>,
    /// Default redirect URI for login URLs and code exchange
    pub redirect_uri: Option<String>,
    /// Default scopes to request
    #[serde(default)]
    pub scopes: Vec<String>,
    /// User agent sent with every request
    pub user_agent: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl ProjectConfig {
    /// Discovers and loads project configuration by walking up the directory tree.
    ///
    /// Starts from the current working directory and walks up until it finds
    /// a .octolink.yaml file or reaches the filesystem root.
    pub fn discover() -> Result<Self> {
        let current_dir = env::current_dir().context("Failed to get current working directory")?;

        Self::discover_from_path(&current_dir)
    }

    /// Discovers and loads project configuration starting from a specific path.
    ///
    /// Returns a default empty configuration if no file is found.
    pub fn discover_from_path(start_path: &Path) -> Result<Self> {
        let mut current_path = start_path.to_path_buf();

        loop {
            let config_path = current_path.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                tracing::debug!("Found {} at: {}", CONFIG_FILE_NAME, config_path.display());
                return Self::load_from_file(&config_path);
            }

            if let Some(parent) = current_path.parent() {
                current_path = parent.to_path_buf();
            } else {
                tracing::debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
                return Ok(Self::default());
            }
        }
    }

    /// Loads and validates project configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ProjectConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::info!("Loaded project config from: {}", path.display());
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if an address does not parse or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url).with_context(|| format!("Invalid base_url '{}'", base_url))?;
        }

        if let Some(redirect_uri) = &self.redirect_uri {
            Url::parse(redirect_uri)
                .with_context(|| format!("Invalid redirect_uri '{}'", redirect_uri))?;
        }

        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Builds the connection settings, with `base_url` taking precedence
    /// over the configured one.
    pub fn connection_config(&self, base_url: Option<&str>) -> Result<ConnectionConfig> {
        let mut config = ConnectionConfig::default();

        if let Some(base_url) = base_url.or(self.base_url.as_deref()) {
            let base_address =
                Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;
            config = config.with_base_address(base_address);
        }

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        if let Some(timeout_secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(timeout_secs));
        }

        Ok(config)
    }
}
