//! Configuration parser for workspace and directory configuration.
//!
//! This module loads `~/.rad/config.yaml`, applies environment variable
//! overrides and locates the per-directory `.rad/rad.yaml`.

use crate::error::{ConfigError, RadError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::workspace::{CliConfig, DirectoryConfig};

/// Environment variable naming the workspace to use.
pub const WORKSPACE_ENV_VAR: &str = "RAD_WORKSPACE";

/// Environment variable forcing the management endpoint.
pub const ENDPOINT_ENV_VAR: &str = "RAD_UCP_ENDPOINT";

/// Environment variable holding a bearer token for the management API.
pub const TOKEN_ENV_VAR: &str = "RAD_TOKEN";

/// Directory holding per-user and per-directory configuration.
pub const CONFIG_DIR: &str = ".rad";

/// File name of the per-user configuration.
pub const CONFIG_FILE: &str = "config.yaml";

/// File names of the per-directory configuration, in lookup order.
pub const DIRECTORY_CONFIG_FILES: &[&str] = &["rad.yaml", "rad.yml"];

/// Configuration parser for the rad client.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to find `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Returns the default per-user configuration path, `~/.rad/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                RadError::Config(ConfigError::NoHomeDirectory {
                    purpose: String::from("the rad configuration file"),
                })
            })
    }

    /// Loads configuration from a YAML file.
    ///
    /// A missing file yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<CliConfig> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(CliConfig::default());
        }

        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            RadError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<CliConfig> {
        debug!("Parsing YAML configuration");

        // an empty file is a valid, empty configuration
        if content.trim().is_empty() {
            return Ok(CliConfig::default());
        }

        let mut config: CliConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            RadError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        for (name, workspace) in &mut config.workspaces.items {
            workspace.name.clone_from(name);
        }

        debug!("Parsed {} workspace(s)", config.workspaces.items.len());
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<CliConfig> {
        let mut config = self.load_file(path)?;

        apply_overrides(
            &mut config,
            non_empty_var(WORKSPACE_ENV_VAR),
            non_empty_var(ENDPOINT_ENV_VAR),
        );

        Ok(config)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                RadError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Gets the management API token from the environment (optional).
    #[must_use]
    pub fn get_token() -> Option<String> {
        non_empty_var(TOKEN_ENV_VAR)
    }

    /// Parses a directory configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_directory_config(&self, path: impl AsRef<Path>) -> Result<DirectoryConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            return Ok(DirectoryConfig::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            RadError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: Some(path.display().to_string()),
            })
        })
    }
}

/// Applies `RAD_WORKSPACE` and `RAD_UCP_ENDPOINT` style overrides.
pub fn apply_overrides(config: &mut CliConfig, workspace: Option<String>, endpoint: Option<String>) {
    if let Some(workspace) = workspace {
        debug!("Overriding default workspace from environment");
        config.workspaces.default = workspace;
    }

    if let Some(endpoint) = endpoint {
        debug!("Overriding management endpoint from environment");
        config.endpoint_override = Some(endpoint);
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Finds `.rad/rad.yaml` in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if a directory config is found but cannot be parsed.
pub fn find_directory_config(start_dir: impl AsRef<Path>) -> Result<Option<DirectoryConfig>> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DIRECTORY_CONFIG_FILES {
            let config_path = current.join(CONFIG_DIR).join(filename);
            if config_path.is_file() {
                info!("Found directory configuration: {}", config_path.display());
                return ConfigParser::new().load_directory_config(&config_path).map(Some);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Ok(None)
}
