//! rad CLI entrypoint.
//!
//! This is the main entrypoint for the rad command-line tool.

use std::path::PathBuf;
use std::process::ExitCode;

use rad_cli::cli::{Cli, Commands, EnvCommands, OutputFormatter, WorkspaceCommands};
use rad_cli::config::{
    find_directory_config, require_environment, require_scope, require_workspace, CliConfig,
    ConfigParser, ConfigValidator, Workspace,
};
use rad_cli::deploy::{DeployRequest, DeployRunner, EnvironmentResolver, UcpDeploymentClient};
use rad_cli::error::{DeployError, Result};
use rad_cli::management::UcpClient;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Deploy {
            file,
            workspace,
            group,
            environment,
            application,
            parameters,
        } => {
            let request = DeployRequest {
                file,
                group,
                environment,
                application,
                parameters,
            };
            cmd_deploy(&config, workspace.as_deref(), &request, &formatter).await
        }
        Commands::Env {
            command: EnvCommands::Show {
                name_or_id,
                workspace,
                group,
            },
        } => {
            cmd_env_show(
                &config,
                workspace.as_deref(),
                name_or_id.as_deref(),
                group.as_deref(),
                &formatter,
            )
            .await
        }
        Commands::Workspace { command } => match command {
            WorkspaceCommands::List => {
                cmd_workspace_list(&config, &formatter);
                Ok(())
            }
            WorkspaceCommands::Show { name } => cmd_workspace_show(&config, name.as_deref(), &formatter),
        },
    }
}

/// Deploy a template.
async fn cmd_deploy(
    config: &CliConfig,
    workspace_name: Option<&str>,
    request: &DeployRequest,
    formatter: &OutputFormatter,
) -> Result<()> {
    let workspace = select_workspace(config, workspace_name)?;
    let client = create_management_client(&workspace)?;
    let runner = DeployRunner::new(client.clone(), UcpDeploymentClient::new(client));

    let deployment = runner.validate(workspace, request).await?;
    let result = runner.run(deployment).await?;

    let output = formatter.format_deployment(&result);
    eprintln!("{output}");

    Ok(())
}

/// Show an environment.
async fn cmd_env_show(
    config: &CliConfig,
    workspace_name: Option<&str>,
    name_or_id: Option<&str>,
    group: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let workspace = select_workspace(config, workspace_name)?;
    let scope = require_scope(&workspace, group)?;
    let name = require_environment(&workspace, name_or_id)?;
    let client = create_management_client(&workspace)?;

    info!("Looking up environment {name}");
    let resolved = EnvironmentResolver::new(&client).resolve(&name, &scope).await?;
    let environment = resolved.ok_or(DeployError::EnvironmentNotFound { name, scope })?;

    let output = formatter.format_environment(&environment);
    eprintln!("{output}");

    Ok(())
}

/// List workspaces.
fn cmd_workspace_list(config: &CliConfig, formatter: &OutputFormatter) {
    let output = formatter.format_workspaces(config);
    eprintln!("{output}");
}

/// Show a workspace.
fn cmd_workspace_show(config: &CliConfig, name: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let workspace = require_workspace(config, name, None)?;
    let is_default = workspace.name.eq_ignore_ascii_case(&config.workspaces.default);

    let output = formatter.format_workspace(&workspace, is_default);
    eprintln!("{output}");

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads the per-user configuration with environment overrides and validates it.
fn load_config(config_path: Option<&PathBuf>) -> Result<CliConfig> {
    let config_file = match config_path {
        Some(path) => path.clone(),
        None => ConfigParser::default_config_path()?,
    };
    debug!("Loading configuration from: {}", config_file.display());

    let parser = ConfigParser::new();
    parser.load_dotenv()?;

    let config = parser.load_with_env(&config_file)?;

    let result = ConfigValidator::new().validate(&config)?;
    for warning in &result.warnings {
        debug!("{warning}");
    }

    Ok(config)
}

/// Selects the workspace for a command, attaching the directory config.
fn select_workspace(config: &CliConfig, name: Option<&str>) -> Result<Workspace> {
    let directory = find_directory_config(std::env::current_dir()?)?;
    require_workspace(config, name, directory.as_ref())
}

/// Creates a management API client for the workspace's endpoint.
fn create_management_client(workspace: &Workspace) -> Result<UcpClient> {
    let endpoint = workspace.endpoint()?;
    UcpClient::new(&endpoint, ConfigParser::get_token())
}
