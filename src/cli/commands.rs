//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rad - Deploy applications to the control plane.
#[derive(Parser, Debug)]
#[command(name = "rad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (defaults to ~/.rad/config.yaml).
    #[arg(long, global = true, env = "RAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a template into an environment.
    Deploy {
        /// Template file (.bicep or compiled .json).
        file: PathBuf,

        /// Workspace to use instead of the default.
        #[arg(short, long)]
        workspace: Option<String>,

        /// Resource group to deploy into.
        #[arg(short, long)]
        group: Option<String>,

        /// Environment name or resource ID.
        #[arg(short, long)]
        environment: Option<String>,

        /// Application name.
        #[arg(short, long)]
        application: Option<String>,

        /// Template parameters: `name=value`, `name=@file.json` or `@file.json`.
        #[arg(short, long)]
        parameters: Vec<String>,
    },

    /// Manage environments.
    Env {
        /// Environment subcommand.
        #[command(subcommand)]
        command: EnvCommands,
    },

    /// Manage workspaces.
    Workspace {
        /// Workspace subcommand.
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
}

/// Environment subcommands.
#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// Show an environment from either provider namespace.
    Show {
        /// Environment name or resource ID (defaults to the workspace environment).
        name_or_id: Option<String>,

        /// Workspace to use instead of the default.
        #[arg(short, long)]
        workspace: Option<String>,

        /// Resource group to search.
        #[arg(short, long)]
        group: Option<String>,
    },
}

/// Workspace subcommands.
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// List configured workspaces.
    List,

    /// Show a workspace (defaults to the current one).
    Show {
        /// Workspace name.
        name: Option<String>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
