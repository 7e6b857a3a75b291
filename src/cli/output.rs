//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{CliConfig, Workspace};
use crate::deploy::{configure, DeploymentResult, EnvironmentCheckResult};
use crate::resources::ResourceId;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Deployed resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// Workspace row for table display.
#[derive(Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "")]
    current: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Environment")]
    environment: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a finished deployment.
    #[must_use]
    pub fn format_deployment(&self, result: &DeploymentResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => Self::format_deployment_text(result),
        }
    }

    fn format_deployment_text(result: &DeploymentResult) -> String {
        let mut output = format!(
            "{} Deployment {} finished in {}s\n",
            "✓".green(),
            result.name,
            result.duration().num_seconds()
        );

        if result.resources.is_empty() {
            output.push_str("\n   No resources deployed.\n");
        } else {
            let rows: Vec<ResourceRow> = result.resources.iter().map(String::as_str).map(Self::resource_row).collect();
            output.push_str("\nResources:\n");
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        if !result.outputs.is_empty() {
            output.push_str("\nOutputs:\n");
            for (name, value) in &result.outputs {
                let _ = writeln!(output, "   {name}: {}", Self::output_value(value));
            }
        }

        output
    }

    fn resource_row(id: &str) -> ResourceRow {
        match ResourceId::parse(id) {
            Ok(parsed) if parsed.is_resource() => ResourceRow {
                resource_type: parsed.resource_type(),
                name: parsed.name().to_string(),
            },
            _ => ResourceRow {
                resource_type: String::from("-"),
                name: id.to_string(),
            },
        }
    }

    /// Deployment outputs are `{ "type": ..., "value": ... }` objects; show the value.
    fn output_value(output: &Value) -> String {
        match output.get("value").unwrap_or(output) {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Formats a resolved environment.
    #[must_use]
    pub fn format_environment(&self, environment: &EnvironmentCheckResult) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = match environment {
                    EnvironmentCheckResult::ApplicationsCore(env) => serde_json::to_string_pretty(env),
                    EnvironmentCheckResult::RadiusCore(env) => serde_json::to_string_pretty(env),
                };
                json.unwrap_or_default()
            }
            OutputFormat::Text => Self::format_environment_text(environment),
        }
    }

    fn format_environment_text(environment: &EnvironmentCheckResult) -> String {
        let providers = configure(Some(environment), "", "");
        let mut output = String::new();

        let _ = writeln!(output, "\nEnvironment: {}", environment.name().unwrap_or("-").bold());
        let _ = writeln!(output, "   Namespace: {}", environment.namespace());
        let _ = writeln!(output, "   ID: {}", environment.id().unwrap_or("-"));

        if let Some(azure) = &providers.azure {
            let _ = writeln!(output, "   Azure scope: {}", azure.scope);
        }
        if let Some(aws) = &providers.aws {
            let _ = writeln!(output, "   AWS scope: {}", aws.scope);
        }

        output
    }

    /// Formats the list of configured workspaces.
    #[must_use]
    pub fn format_workspaces(&self, config: &CliConfig) -> String {
        let section = &config.workspaces;

        match self.format {
            OutputFormat::Json => {
                let items: Vec<WorkspaceJson<'_>> = section
                    .items
                    .values()
                    .map(|ws| WorkspaceJson::new(ws, ws.name.eq_ignore_ascii_case(&section.default)))
                    .collect();
                serde_json::to_string_pretty(&items).unwrap_or_default()
            }
            OutputFormat::Text => {
                if section.items.is_empty() {
                    return String::from("No workspaces configured.\n");
                }

                let rows: Vec<WorkspaceRow> = section
                    .items
                    .values()
                    .map(|ws| WorkspaceRow {
                        current: if ws.name.eq_ignore_ascii_case(&section.default) {
                            "*".green().to_string()
                        } else {
                            String::new()
                        },
                        name: ws.name.clone(),
                        connection: ws.connection.kind.to_string(),
                        scope: ws.scope.clone(),
                        environment: Self::last_segment(&ws.environment),
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats a single workspace.
    #[must_use]
    pub fn format_workspace(&self, workspace: &Workspace, is_default: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&WorkspaceJson::new(workspace, is_default)).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();
                let marker = if is_default { " (default)".dimmed().to_string() } else { String::new() };

                let _ = writeln!(output, "\nWorkspace: {}{marker}", workspace.name.bold());
                let _ = writeln!(output, "   Connection: {}", workspace.connection.kind);
                if let Some(context) = &workspace.connection.context {
                    let _ = writeln!(output, "   Context: {context}");
                }
                if let Ok(endpoint) = workspace.endpoint() {
                    let _ = writeln!(output, "   Endpoint: {endpoint}");
                }
                let _ = writeln!(output, "   Scope: {}", Self::or_dash(&workspace.scope));
                let _ = writeln!(output, "   Environment: {}", Self::or_dash(&workspace.environment));
                if !workspace.default_application.is_empty() {
                    let _ = writeln!(output, "   Default application: {}", workspace.default_application);
                }

                output
            }
        }
    }

    fn last_segment(id: &str) -> String {
        ResourceId::parse(id).map_or_else(|_| id.to_string(), |parsed| parsed.name().to_string())
    }

    fn or_dash(value: &str) -> &str {
        if value.is_empty() { "-" } else { value }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceJson<'a> {
    name: &'a str,
    default: bool,
    #[serde(flatten)]
    workspace: &'a Workspace,
}

impl<'a> WorkspaceJson<'a> {
    const fn new(workspace: &'a Workspace, default: bool) -> Self {
        Self {
            name: workspace.name.as_str(),
            default,
            workspace,
        }
    }
}
