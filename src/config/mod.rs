//! Configuration module for the rad client.
//!
//! This module handles all configuration-related functionality:
//! - Parsing `~/.rad/config.yaml` and the per-directory `.rad/rad.yaml`
//! - Environment variable overrides and `.env` loading
//! - Validation of workspace definitions
//! - Selecting the workspace, scope, environment and application for a command

mod parser;
mod selection;
mod validator;
mod workspace;

pub use parser::{
    apply_overrides, find_directory_config, ConfigParser, CONFIG_DIR, CONFIG_FILE,
    DIRECTORY_CONFIG_FILES, ENDPOINT_ENV_VAR, TOKEN_ENV_VAR, WORKSPACE_ENV_VAR,
};
pub use selection::{read_application, require_environment, require_scope, require_workspace};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
pub use workspace::{
    CliConfig, Connection, ConnectionKind, ConnectionOverrides, DirectoryConfig,
    DirectoryWorkspace, Workspace, WorkspaceSection, FALLBACK_ENVIRONMENT, FALLBACK_SCOPE,
    FALLBACK_WORKSPACE_NAME,
};
