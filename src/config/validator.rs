//! Configuration validation for workspace configuration.
//!
//! Every workspace is checked and all problems are collected before the
//! first one is reported.

use crate::error::{ConfigError, RadError, Result};
use crate::resources::ResourceId;
use tracing::debug;

use super::workspace::{CliConfig, ConnectionKind, Workspace};

/// Validator for workspace configuration.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any check fails.
    pub fn validate(&self, config: &CliConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();
        let section = &config.workspaces;

        if !section.default.is_empty() && !section.has_workspace(&section.default) {
            result.errors.push(ValidationError {
                field: String::from("workspaces.default"),
                message: format!("Default workspace '{}' is not defined", section.default),
            });
        }

        for (name, workspace) in &section.items {
            Self::validate_workspace(name, workspace, config.endpoint_override.is_some(), &mut result);
        }

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(RadError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }

    fn validate_workspace(
        name: &str,
        workspace: &Workspace,
        has_endpoint_override: bool,
        result: &mut ValidationResult,
    ) {
        let field = |key: &str| format!("workspaces.items.{name}.{key}");

        if name.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("workspaces.items"),
                message: String::from("Workspace name cannot be empty"),
            });
        }

        if workspace.scope.is_empty() {
            result
                .warnings
                .push(format!("Workspace '{name}' has no scope; pass --group to commands"));
        } else if let Err(e) = ResourceId::parse(&workspace.scope) {
            result.errors.push(ValidationError {
                field: field("scope"),
                message: e.to_string(),
            });
        }

        if !workspace.environment.is_empty() {
            match ResourceId::parse(&workspace.environment) {
                Ok(id) if id.resource_type().eq_ignore_ascii_case("Applications.Core/environments")
                    || id.resource_type().eq_ignore_ascii_case("Radius.Core/environments") => {}
                Ok(_) => result.errors.push(ValidationError {
                    field: field("environment"),
                    message: format!("'{}' is not an environment ID", workspace.environment),
                }),
                Err(e) => result.errors.push(ValidationError {
                    field: field("environment"),
                    message: e.to_string(),
                }),
            }
        }

        let connection = &workspace.connection;
        if connection.kind == ConnectionKind::Url
            && connection.url.as_deref().is_none_or(str::is_empty)
            && connection.overrides.ucp.is_none()
        {
            result.errors.push(ValidationError {
                field: field("connection.url"),
                message: format!("Workspace '{name}' uses a url connection without a url"),
            });
        }

        if connection.kind == ConnectionKind::Kubernetes
            && connection.overrides.ucp.is_none()
            && !has_endpoint_override
        {
            result.warnings.push(format!(
                "Workspace '{name}' has no management endpoint; set connection.overrides.ucp or RAD_UCP_ENDPOINT"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParser;

    fn parse(yaml: &str) -> CliConfig {
        ConfigParser::new().parse_yaml(yaml, None).expect("valid yaml")
    }

    #[test]
    fn test_valid_config() {
        let config = parse(
            r"
workspaces:
  default: dev
  items:
    dev:
      connection: { kind: url, url: http://localhost:9000 }
      scope: /planes/radius/local/resourceGroups/dev
      environment: /planes/radius/local/resourceGroups/dev/providers/Radius.Core/environments/dev
",
        );

        let result = ConfigValidator::new().validate(&config).expect("valid");

        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_default() {
        let config = parse("workspaces:\n  default: missing\n");

        let error = ConfigValidator::new().validate(&config).expect_err("invalid");

        assert!(error.to_string().contains("Default workspace 'missing' is not defined"));
    }

    #[test]
    fn test_invalid_scope_and_environment() {
        let config = parse(
            r"
workspaces:
  items:
    dev:
      scope: not-a-scope
      environment: /planes/radius/local/resourceGroups/dev/providers/Applications.Core/applications/web
",
        );

        let mut result = ValidationResult::default();
        ConfigValidator::validate_workspace("dev", &config.workspaces.items["dev"], false, &mut result);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["workspaces.items.dev.scope", "workspaces.items.dev.environment"]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_url_connection_requires_url() {
        let config = parse(
            r"
workspaces:
  items:
    dev:
      connection: { kind: url }
      scope: /planes/radius/local/resourceGroups/dev
",
        );

        assert!(ConfigValidator::new().validate(&config).is_err());
    }
}
