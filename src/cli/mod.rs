//! CLI module for the rad client.
//!
//! This module provides the command-line interface for deploying templates
//! and inspecting environments and workspaces.

mod commands;
mod output;

pub use commands::{Cli, Commands, EnvCommands, OutputFormat, WorkspaceCommands};
pub use output::OutputFormatter;
