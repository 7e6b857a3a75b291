//! Management API integration module.
//!
//! This module provides the client for the control plane's resource API and
//! the resource shapes of both provider namespaces.

mod api;
mod client;
mod types;

pub use api::ManagementClient;
pub use client::UcpClient;
pub use types::{
    ApplicationProperties, ApplicationResource, ApplicationsCoreEnvironment,
    ApplicationsCoreEnvironmentProperties, ApplicationsCoreProviders, AzureSubscriptionBinding,
    ErrorDetails, ErrorResponse, KubernetesBinding, RadiusCoreEnvironment,
    RadiusCoreEnvironmentProperties, RadiusCoreProviders, ScopeBinding, LOCATION_GLOBAL,
};
