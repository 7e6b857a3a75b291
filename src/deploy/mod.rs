//! The deploy workflow.
//!
//! This module resolves the target environment across both provider
//! namespaces, derives provider settings, and submits the template to the
//! deployment engine.

mod deployment;
mod providers;
mod resolver;
mod runner;

#[cfg(test)]
mod fakes;

pub use deployment::{
    DeploymentClient, DeploymentOptions, DeploymentResult, ProviderConfig, ProviderEntry,
    ProviderScope, UcpDeploymentClient, DEPLOYMENTS_API_VERSION,
};
pub use providers::{configure, AwsProvider, AzureProvider, Providers, RadiusProvider};
pub use resolver::{EnvironmentCheckResult, EnvironmentResolver};
pub use runner::{DeployRequest, DeployRunner, ValidatedDeployment, COMPLETION_TEXT};
