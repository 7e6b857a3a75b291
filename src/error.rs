//! Error types for the rad command-line client.
//!
//! This module provides the error hierarchy for every stage of a command:
//! configuration, management API calls, template preparation and the
//! deploy workflow itself. User-facing deploy errors render transparently
//! so their exact text reaches the terminal.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the rad client.
#[derive(Debug, Error)]
pub enum RadError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Management API errors.
    #[error("Management API error: {0}")]
    Management(#[from] ManagementError),

    /// Template preparation errors.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Deploy workflow errors, shown to the user as-is.
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// The requested workspace does not exist in the configuration.
    #[error("The workspace '{name}' does not exist. Use `rad workspace list` to see the available workspaces.")]
    WorkspaceNotFound {
        /// Name of the missing workspace.
        name: String,
    },

    /// The workspace connection does not resolve to a management endpoint.
    #[error("Workspace '{workspace}' has no management endpoint: {reason}")]
    NoEndpoint {
        /// Workspace name.
        workspace: String,
        /// Why no endpoint could be derived.
        reason: String,
    },

    /// The home directory could not be determined.
    #[error("Could not determine the home directory for {purpose}")]
    NoHomeDirectory {
        /// What the home directory was needed for.
        purpose: String,
    },
}

/// Management API (transport and server) errors.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// Authentication failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// API request failed with a non-success status.
    #[error("Request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error communicating with the control plane: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid response from the control plane: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Outcome of a remote lookup that did not return a resource.
///
/// `NotFound` is an expected outcome that callers branch on; `Transport`
/// wraps every other failure and is always fatal.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The resource does not exist.
    #[error("Resource not found: {id}")]
    NotFound {
        /// Resource ID that was looked up.
        id: String,
    },

    /// Any failure other than absence.
    #[error(transparent)]
    Transport(#[from] ManagementError),
}

/// Template preparation and parameter errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file does not exist.
    #[error("Template file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The template is not valid JSON or is not an object.
    #[error("Invalid template {path}: {message}")]
    InvalidTemplate {
        /// Path to the template.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// A section of the template does not have the expected shape.
    #[error("Template section '{section}' is malformed: {message}")]
    MalformedSection {
        /// Section name, e.g. `parameters`.
        section: String,
        /// Description of the problem.
        message: String,
    },

    /// The Bicep compiler failed.
    #[error("Failed to compile {path}: {stderr}")]
    CompileFailed {
        /// Path to the template.
        path: PathBuf,
        /// Compiler diagnostics.
        stderr: String,
    },

    /// A `--parameters` argument could not be understood.
    #[error("Invalid parameter '{arg}': {message}")]
    InvalidParameter {
        /// The offending argument.
        arg: String,
        /// Description of the problem.
        message: String,
    },
}

/// Errors of the deploy workflow. These are rendered to the user verbatim.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The same environment name exists in both provider namespaces.
    #[error(
        "Conflict detected: Environment '{name}' exists in both Applications.Core and Radius.Core providers. \
         Please specify the full resource ID to disambiguate:\n  Applications.Core: {applications_core_id}\n  Radius.Core: {radius_core_id}"
    )]
    EnvironmentConflict {
        /// Name or ID the user supplied.
        name: String,
        /// ID of the Applications.Core environment.
        applications_core_id: String,
        /// ID of the Radius.Core environment.
        radius_core_id: String,
    },

    /// The environment does not exist in either namespace.
    #[error(
        "The environment \"{name}\" does not exist in scope \"{scope}\". Run `rad env create` first. \
         You could also provide the environment ID if the environment exists in a different group."
    )]
    EnvironmentNotFound {
        /// Name or ID the user supplied.
        name: String,
        /// Scope that was searched.
        scope: String,
    },

    /// No environment was supplied and none is configured.
    #[error(
        "no environment name or ID provided and no default environment set, either pass in an environment \
         name or set a default environment by using `rad env switch`"
    )]
    EnvironmentRequired,

    /// No resource group was supplied and the workspace has no scope.
    #[error("No resource group set, use `--group` to pass in a resource group name.")]
    ScopeRequired,

    /// The template declares parameters that were not supplied.
    #[error("The template \"{file}\" could not be deployed because of the following errors:\n\n{details}")]
    MissingParameters {
        /// Template file path as given by the user.
        file: String,
        /// Sorted, bulleted message lines.
        details: String,
    },

    /// The remote deployment finished in a failed state.
    #[error("Deployment {name} {state}: {message}")]
    DeploymentFailed {
        /// Deployment resource name.
        name: String,
        /// Terminal provisioning state.
        state: String,
        /// Error details from the control plane.
        message: String,
    },
}

/// Result type alias for rad operations.
pub type Result<T> = std::result::Result<T, RadError>;

impl From<LookupError> for RadError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::NotFound { id } => Self::Management(ManagementError::api_error(
                404,
                format!("Resource not found: {id}"),
            )),
            LookupError::Transport(e) => Self::Management(e),
        }
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ManagementError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if the request may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::NetworkError { .. })
    }

    /// Returns the delay the server asked for before retrying, if any.
    #[must_use]
    pub const fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl LookupError {
    /// Creates a not-found signal for the given resource ID.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Converts a lookup into an optional value, keeping only fatal errors.
///
/// # Errors
///
/// Returns the transport error if the lookup failed for any reason other
/// than absence.
pub fn found<T>(lookup: std::result::Result<T, LookupError>) -> std::result::Result<Option<T>, ManagementError> {
    match lookup {
        Ok(value) => Ok(Some(value)),
        Err(LookupError::NotFound { .. }) => Ok(None),
        Err(LookupError::Transport(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let error = RadError::from(DeployError::MissingParameters {
            file: String::from("app.bicep"),
            details: String::from("  - first\n  - second"),
        });

        assert_eq!(
            error.to_string(),
            "The template \"app.bicep\" could not be deployed because of the following errors:\n\n  - first\n  - second"
        );
    }

    #[test]
    fn test_conflict_message_names_both_ids() {
        let error = DeployError::EnvironmentConflict {
            name: String::from("prod"),
            applications_core_id: String::from("/a/providers/Applications.Core/environments/prod"),
            radius_core_id: String::from("/a/providers/Radius.Core/environments/prod"),
        };
        let text = error.to_string();

        assert!(text.starts_with("Conflict detected: Environment 'prod' exists in both"));
        assert!(text.contains("\n  Applications.Core: /a/providers/Applications.Core/environments/prod"));
        assert!(text.ends_with("\n  Radius.Core: /a/providers/Radius.Core/environments/prod"));
    }

    #[test]
    fn test_found_keeps_only_fatal_errors() {
        let present: std::result::Result<u32, LookupError> = Ok(7);
        assert_eq!(found(present).expect("present"), Some(7));

        let absent: std::result::Result<u32, LookupError> = Err(LookupError::not_found("/x"));
        assert_eq!(found(absent).expect("absent"), None);

        let broken: std::result::Result<u32, LookupError> =
            Err(LookupError::Transport(ManagementError::api_error(500, "boom")));
        assert!(found(broken).is_err());
    }

    #[test]
    fn test_retryable() {
        assert!(ManagementError::network("reset").is_retryable());
        assert!(ManagementError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(!ManagementError::api_error(400, "bad").is_retryable());
    }

    #[test]
    fn test_retry_delay_follows_server() {
        assert_eq!(ManagementError::RateLimited { retry_after_secs: 60 }.retry_delay_secs(), Some(60));
        assert_eq!(ManagementError::network("reset").retry_delay_secs(), None);
    }
}
