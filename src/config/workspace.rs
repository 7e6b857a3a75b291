//! Workspace configuration types.
//!
//! These types map directly to `~/.rad/config.yaml` and to the per-directory
//! `.rad/rad.yaml` file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;

/// Name of the workspace used when nothing is configured.
pub const FALLBACK_WORKSPACE_NAME: &str = "default";

/// Scope of the workspace used when nothing is configured.
pub const FALLBACK_SCOPE: &str = "/planes/radius/local/resourceGroups/default";

/// Environment of the workspace used when nothing is configured.
pub const FALLBACK_ENVIRONMENT: &str =
    "/planes/radius/local/resourceGroups/default/providers/Applications.Core/environments/default";

/// Root of the per-user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Configured workspaces.
    #[serde(default)]
    pub workspaces: WorkspaceSection,

    /// Management endpoint forced through the environment; wins over every
    /// workspace connection.
    #[serde(skip)]
    pub endpoint_override: Option<String>,
}

/// The `workspaces` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSection {
    /// Name of the default workspace; empty when unset.
    #[serde(default)]
    pub default: String,

    /// Workspaces by name.
    #[serde(default)]
    pub items: BTreeMap<String, Workspace>,
}

impl WorkspaceSection {
    /// Returns true if a workspace with this name exists (case-insensitive).
    #[must_use]
    pub fn has_workspace(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Returns the named workspace, or the default one when `name` is empty.
    ///
    /// Returns `Ok(None)` when no name is given and no default is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkspaceNotFound`] if the selected workspace
    /// does not exist.
    pub fn get_workspace(&self, name: &str) -> Result<Option<&Workspace>, ConfigError> {
        let name = if name.is_empty() { self.default.as_str() } else { name };
        if name.is_empty() {
            return Ok(None);
        }

        self.find(name)
            .map(Some)
            .ok_or_else(|| ConfigError::WorkspaceNotFound {
                name: name.to_string(),
            })
    }

    fn find(&self, name: &str) -> Option<&Workspace> {
        self.items
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, ws)| ws)
    }
}

/// A named target: where to connect and which scope and environment to use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Workspace name; filled from the key it is stored under.
    #[serde(skip)]
    pub name: String,

    /// How to reach the control plane.
    #[serde(default)]
    pub connection: Connection,

    /// Default resource group scope.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// Default environment ID.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub environment: String,

    /// Default application name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_application: String,

    /// Settings from the directory the command runs in.
    #[serde(skip)]
    pub directory_config: DirectoryConfig,
}

impl Workspace {
    /// Returns the workspace used when nothing is configured.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_WORKSPACE_NAME.to_string(),
            connection: Connection::default(),
            scope: FALLBACK_SCOPE.to_string(),
            environment: FALLBACK_ENVIRONMENT.to_string(),
            ..Self::default()
        }
    }

    /// Resolves the management API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoEndpoint`] if the connection does not name
    /// an endpoint.
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        if let Some(ucp) = self.connection.overrides.ucp.as_deref().filter(|u| !u.is_empty()) {
            return Ok(ucp.to_string());
        }

        match self.connection.kind {
            ConnectionKind::Url => self
                .connection
                .url
                .clone()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| ConfigError::NoEndpoint {
                    workspace: self.name.clone(),
                    reason: String::from("url connections need a `url`"),
                }),
            ConnectionKind::Kubernetes => Err(ConfigError::NoEndpoint {
                workspace: self.name.clone(),
                reason: String::from(
                    "kubernetes connections need `overrides.ucp`, or set RAD_UCP_ENDPOINT",
                ),
            }),
        }
    }
}

/// Connection settings of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection kind.
    #[serde(default)]
    pub kind: ConnectionKind,

    /// Kubernetes context name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Endpoint overrides.
    #[serde(default, skip_serializing_if = "ConnectionOverrides::is_empty")]
    pub overrides: ConnectionOverrides,

    /// Endpoint of a `url` connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Endpoint overrides of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOverrides {
    /// Management API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ucp: Option<String>,
}

impl ConnectionOverrides {
    /// Returns true if nothing is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ucp.is_none()
    }
}

/// How a workspace reaches the control plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Through a Kubernetes cluster.
    #[default]
    Kubernetes,
    /// Directly at a URL.
    Url,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kubernetes => write!(f, "kubernetes"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Contents of `.rad/rad.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Workspace settings for this directory.
    #[serde(default)]
    pub workspace: DirectoryWorkspace,
}

/// The `workspace` section of `.rad/rad.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryWorkspace {
    /// Application name used by commands run in this directory.
    #[serde(default)]
    pub application: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> WorkspaceSection {
        let mut items = BTreeMap::new();
        items.insert(
            String::from("local"),
            Workspace {
                name: String::from("local"),
                scope: String::from("/planes/radius/local/resourceGroups/dev"),
                ..Workspace::default()
            },
        );
        WorkspaceSection {
            default: String::from("local"),
            items,
        }
    }

    #[test]
    fn test_get_default_workspace() {
        let section = section();
        let ws = section.get_workspace("").expect("lookup").expect("workspace");

        assert_eq!(ws.name, "local");
    }

    #[test]
    fn test_get_workspace_ignores_case() {
        assert!(section().has_workspace("LOCAL"));
        assert!(section().get_workspace("Local").expect("lookup").is_some());
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let error = section().get_workspace("prod").expect_err("missing");

        assert!(matches!(error, ConfigError::WorkspaceNotFound { ref name } if name == "prod"));
    }

    #[test]
    fn test_no_default_yields_none() {
        let section = WorkspaceSection::default();

        assert!(section.get_workspace("").expect("lookup").is_none());
    }

    #[test]
    fn test_fallback_workspace() {
        let ws = Workspace::fallback();

        assert_eq!(ws.name, "default");
        assert_eq!(ws.scope, FALLBACK_SCOPE);
        assert_eq!(ws.connection.kind, ConnectionKind::Kubernetes);
        assert!(ws.endpoint().is_err());
    }

    #[test]
    fn test_endpoint_resolution() {
        let mut ws = Workspace {
            connection: Connection {
                kind: ConnectionKind::Url,
                url: Some(String::from("http://localhost:9000")),
                ..Connection::default()
            },
            ..Workspace::default()
        };
        assert_eq!(ws.endpoint().expect("url"), "http://localhost:9000");

        ws.connection.overrides.ucp = Some(String::from("http://override:9443"));
        assert_eq!(ws.endpoint().expect("override"), "http://override:9443");
    }
}
