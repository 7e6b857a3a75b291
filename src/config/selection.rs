//! Picking the workspace, scope, environment and application for a command.
//!
//! Each value comes from a command-line flag when given and falls back to
//! the workspace configuration.

use tracing::debug;

use crate::error::{DeployError, Result};

use super::workspace::{CliConfig, DirectoryConfig, Workspace};

/// Returns the workspace a command runs against.
///
/// `name` selects a workspace explicitly; otherwise the configured default is
/// used, and with no default the fallback workspace. The directory config is
/// attached to the result.
///
/// # Errors
///
/// Returns an error if a selected workspace does not exist.
pub fn require_workspace(
    config: &CliConfig,
    name: Option<&str>,
    directory: Option<&DirectoryConfig>,
) -> Result<Workspace> {
    let mut workspace = config
        .workspaces
        .get_workspace(name.unwrap_or_default())?
        .cloned()
        .unwrap_or_else(|| {
            debug!("No workspace configured, using the fallback workspace");
            Workspace::fallback()
        });

    if let Some(endpoint) = &config.endpoint_override {
        workspace.connection.overrides.ucp = Some(endpoint.clone());
    }

    if let Some(directory) = directory {
        workspace.directory_config = directory.clone();
    }

    Ok(workspace)
}

/// Returns the resource group scope: `--group`, else the workspace scope.
///
/// # Errors
///
/// Returns [`DeployError::ScopeRequired`] if neither is set.
pub fn require_scope(workspace: &Workspace, group: Option<&str>) -> Result<String> {
    match group.filter(|g| !g.is_empty()) {
        Some(group) => Ok(format!("/planes/radius/local/resourceGroups/{group}")),
        None if !workspace.scope.is_empty() => Ok(workspace.scope.clone()),
        None => Err(DeployError::ScopeRequired.into()),
    }
}

/// Returns the environment name or ID: `--environment`, else the workspace
/// environment.
///
/// # Errors
///
/// Returns [`DeployError::EnvironmentRequired`] if neither is set.
pub fn require_environment(workspace: &Workspace, flag: Option<&str>) -> Result<String> {
    match flag.filter(|e| !e.is_empty()) {
        Some(environment) => Ok(environment.to_string()),
        None if !workspace.environment.is_empty() => Ok(workspace.environment.clone()),
        None => Err(DeployError::EnvironmentRequired.into()),
    }
}

/// Returns the application name, or an empty string when none is set.
///
/// Sources in order: `--application`, the workspace default application,
/// the directory config.
#[must_use]
pub fn read_application(workspace: &Workspace, flag: Option<&str>) -> String {
    [
        flag.unwrap_or_default(),
        workspace.default_application.as_str(),
        workspace.directory_config.workspace.application.as_str(),
    ]
    .into_iter()
    .find(|name| !name.is_empty())
    .unwrap_or_default()
    .to_string()
}
