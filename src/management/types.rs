//! Resource shapes returned by the management API.
//!
//! The two provider namespaces describe environments with different schemas;
//! each gets its own type so callers never guess at a shape.

use serde::{Deserialize, Serialize};

/// Location used for every resource this client creates.
pub const LOCATION_GLOBAL: &str = "global";

/// An environment in the `Applications.Core` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsCoreEnvironment {
    /// Fully-qualified resource ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default)]
    pub name: Option<String>,
    /// Resource type.
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    /// Resource location.
    #[serde(default)]
    pub location: Option<String>,
    /// Environment properties.
    #[serde(default)]
    pub properties: Option<ApplicationsCoreEnvironmentProperties>,
}

/// Properties of an `Applications.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsCoreEnvironmentProperties {
    /// Cloud provider bindings.
    #[serde(default)]
    pub providers: Option<ApplicationsCoreProviders>,
    /// Provisioning state reported by the control plane.
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

/// Cloud provider bindings of an `Applications.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationsCoreProviders {
    /// Azure binding, a ready-made scope.
    #[serde(default)]
    pub azure: Option<ScopeBinding>,
    /// AWS binding, a ready-made scope.
    #[serde(default)]
    pub aws: Option<ScopeBinding>,
}

/// A provider binding expressed as a single scope string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBinding {
    /// Target scope, e.g. `/planes/aws/aws/accounts/123/regions/us-west-2`.
    #[serde(default)]
    pub scope: Option<String>,
}

/// An environment in the `Radius.Core` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusCoreEnvironment {
    /// Fully-qualified resource ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default)]
    pub name: Option<String>,
    /// Resource type.
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    /// Resource location.
    #[serde(default)]
    pub location: Option<String>,
    /// Environment properties.
    #[serde(default)]
    pub properties: Option<RadiusCoreEnvironmentProperties>,
}

/// Properties of a `Radius.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusCoreEnvironmentProperties {
    /// Cloud provider bindings.
    #[serde(default)]
    pub providers: Option<RadiusCoreProviders>,
    /// Recipe packs attached to the environment.
    #[serde(default)]
    pub recipe_packs: Vec<String>,
    /// Provisioning state reported by the control plane.
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

/// Cloud provider bindings of a `Radius.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusCoreProviders {
    /// Azure binding, split into subscription and resource group.
    #[serde(default)]
    pub azure: Option<AzureSubscriptionBinding>,
    /// AWS binding, a ready-made scope.
    #[serde(default)]
    pub aws: Option<ScopeBinding>,
    /// Kubernetes binding.
    #[serde(default)]
    pub kubernetes: Option<KubernetesBinding>,
}

/// Azure binding of a `Radius.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureSubscriptionBinding {
    /// Azure subscription ID.
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Azure resource group name.
    #[serde(default)]
    pub resource_group_name: Option<String>,
}

/// Kubernetes binding of a `Radius.Core` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesBinding {
    /// Target namespace.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// An application resource; both namespaces share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResource {
    /// Fully-qualified resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resource location.
    #[serde(default)]
    pub location: Option<String>,
    /// Application properties.
    #[serde(default)]
    pub properties: ApplicationProperties,
}

/// Properties of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProperties {
    /// ID of the environment the application belongs to.
    #[serde(default)]
    pub environment: String,
}

impl ApplicationResource {
    /// Creates a global application bound to `environment_id`.
    #[must_use]
    pub fn in_environment(environment_id: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            location: Some(String::from(LOCATION_GLOBAL)),
            properties: ApplicationProperties {
                environment: environment_id.into(),
            },
        }
    }
}

/// ARM-style error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// ARM-style error details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: String,
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_radius_core_environment() {
        let json = r#"{
            "id": "/planes/radius/local/resourceGroups/rg/providers/Radius.Core/environments/prod",
            "name": "prod",
            "type": "Radius.Core/environments",
            "location": "global",
            "properties": {
                "providers": {
                    "azure": { "subscriptionId": "sub", "resourceGroupName": "group" },
                    "aws": { "scope": "/planes/aws/aws/accounts/1/regions/us-west-2" }
                },
                "recipePacks": ["/planes/radius/local/resourceGroups/rg/providers/Radius.Core/recipePacks/default"]
            }
        }"#;

        let env: RadiusCoreEnvironment = serde_json::from_str(json).expect("valid environment");
        let providers = env
            .properties
            .as_ref()
            .and_then(|p| p.providers.as_ref())
            .expect("providers");

        assert_eq!(env.name.as_deref(), Some("prod"));
        assert_eq!(
            providers.azure.as_ref().and_then(|a| a.subscription_id.as_deref()),
            Some("sub")
        );
        assert_eq!(
            providers.azure.as_ref().and_then(|a| a.resource_group_name.as_deref()),
            Some("group")
        );
        assert_eq!(env.properties.as_ref().map(|p| p.recipe_packs.len()), Some(1));
    }

    #[test]
    fn test_application_body() {
        let body = serde_json::to_value(ApplicationResource::in_environment("/env")).expect("serializable");

        assert_eq!(
            body,
            serde_json::json!({ "location": "global", "properties": { "environment": "/env" } })
        );
    }
}
