//! Provider settings derived from the resolved environment.

use serde::Serialize;

use crate::management::{AzureSubscriptionBinding, ScopeBinding};
use crate::resources::{resource_id, ResourceId};

use super::resolver::EnvironmentCheckResult;

/// Settings handed to the deployment engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Providers {
    /// Control-plane bindings.
    pub radius: RadiusProvider,
    /// Azure binding, if the environment has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureProvider>,
    /// AWS binding, if the environment has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsProvider>,
}

/// Environment and application the deployment belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusProvider {
    /// Environment resource ID, empty when none was resolved.
    pub environment_id: String,
    /// Application resource ID, empty when no application was named.
    pub application_id: String,
}

/// Azure scope for Azure resources in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AzureProvider {
    /// ARM scope, e.g. `/planes/azure/azure/Subscriptions/<sub>/ResourceGroups/<rg>`.
    pub scope: String,
}

/// AWS scope for AWS resources in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwsProvider {
    /// UCP AWS scope.
    pub scope: String,
}

/// Builds provider settings from the resolved environment.
///
/// With no environment the result is empty. The application ID uses the
/// namespace exactly as spelled in the environment's ID so that the two IDs
/// agree.
#[must_use]
pub fn configure(
    environment: Option<&EnvironmentCheckResult>,
    application_name: &str,
    scope: &str,
) -> Providers {
    let Some(environment) = environment else {
        return Providers::default();
    };

    let mut providers = match environment {
        EnvironmentCheckResult::ApplicationsCore(env) => {
            let bindings = env.properties.as_ref().and_then(|p| p.providers.as_ref());
            Providers {
                azure: bindings
                    .and_then(|b| scope_of(b.azure.as_ref()))
                    .map(|scope| AzureProvider { scope }),
                aws: bindings
                    .and_then(|b| scope_of(b.aws.as_ref()))
                    .map(|scope| AwsProvider { scope }),
                ..Providers::default()
            }
        }
        EnvironmentCheckResult::RadiusCore(env) => {
            let bindings = env.properties.as_ref().and_then(|p| p.providers.as_ref());
            Providers {
                azure: bindings
                    .and_then(|b| b.azure.as_ref())
                    .and_then(azure_scope)
                    .map(|scope| AzureProvider { scope }),
                aws: bindings
                    .and_then(|b| scope_of(b.aws.as_ref()))
                    .map(|scope| AwsProvider { scope }),
                ..Providers::default()
            }
        }
    };

    if let Some(id) = environment.id() {
        providers.radius.environment_id = id.to_string();
    }

    if !application_name.is_empty() {
        let namespace = ResourceId::parse(&providers.radius.environment_id).map_or_else(
            |_| environment.namespace().as_str().to_string(),
            |id| id.provider_namespace().to_string(),
        );
        providers.radius.application_id = resource_id(scope, &namespace, "applications", application_name);
    }

    providers
}

fn scope_of(binding: Option<&ScopeBinding>) -> Option<String> {
    binding
        .and_then(|b| b.scope.as_deref())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the Azure scope from a subscription binding.
///
/// Without a resource group the scope stops at the subscription.
fn azure_scope(binding: &AzureSubscriptionBinding) -> Option<String> {
    let subscription = binding.subscription_id.as_deref().filter(|s| !s.is_empty())?;

    let scope = match binding.resource_group_name.as_deref().filter(|g| !g.is_empty()) {
        Some(group) => format!("/planes/azure/azure/Subscriptions/{subscription}/ResourceGroups/{group}"),
        None => format!("/planes/azure/azure/Subscriptions/{subscription}"),
    };

    Some(scope)
}
