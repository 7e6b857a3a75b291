//! Template deployment against the control plane's deployment engine.
//!
//! A deployment is a `Microsoft.Resources/deployments` resource created
//! under the target resource group and polled until it reaches a terminal
//! provisioning state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DeployError, ManagementError, RadError, Result};
use crate::management::{ErrorDetails, UcpClient};
use crate::template::ParameterSet;

use super::providers::Providers;

/// API version of the deployment engine.
pub const DEPLOYMENTS_API_VERSION: &str = "2020-10-01";

/// Resource type of a deployment.
const DEPLOYMENTS_TYPE: &str = "Microsoft.Resources/deployments";

/// Provider kind that handles nested deployments.
const DEPLOYMENTS_PROVIDER: &str = "Microsoft.Resources";

/// Interval between status polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Upper bound on status polls before giving up (one hour at the default interval).
const DEFAULT_MAX_POLLS: u32 = 720;

/// Everything needed to submit one deployment.
#[derive(Debug, Clone)]
pub struct DeploymentOptions {
    /// Resource group scope the deployment runs in.
    pub scope: String,
    /// Compiled template.
    pub template: Value,
    /// Parameter values, including injected ones.
    pub parameters: ParameterSet,
    /// Provider settings.
    pub providers: Providers,
    /// Message shown when the deployment starts.
    pub progress_text: String,
    /// Message shown when the deployment finishes.
    pub completion_text: String,
}

/// Summary of a finished deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    /// Deployment resource name.
    pub name: String,
    /// IDs of the resources the deployment produced.
    pub resources: Vec<String>,
    /// Template outputs by name.
    pub outputs: Map<String, Value>,
    /// When the deployment was submitted.
    pub started_at: DateTime<Utc>,
    /// When the deployment reached its terminal state.
    pub completed_at: DateTime<Utc>,
}

impl DeploymentResult {
    /// Returns the wall-clock duration of the deployment.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}

/// Submits deployments and waits for them to finish.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Runs a deployment to completion.
    async fn deploy(&self, options: &DeploymentOptions) -> Result<DeploymentResult>;
}

/// One entry of the deployment's `providerConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    /// Provider kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider settings.
    pub value: ProviderScope,
}

/// The scope a provider deploys into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderScope {
    /// Scope ID.
    pub scope: String,
}

/// Per-provider scopes sent with a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderConfig {
    /// Control-plane resources.
    pub radius: ProviderEntry,
    /// Nested deployments.
    pub deployments: ProviderEntry,
    /// Azure resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub az: Option<ProviderEntry>,
    /// AWS resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<ProviderEntry>,
}

impl ProviderConfig {
    /// Builds the provider config for a deployment into `scope`.
    #[must_use]
    pub fn new(scope: &str, providers: &Providers) -> Self {
        Self {
            radius: ProviderEntry::new("Radius", scope),
            deployments: ProviderEntry::new(DEPLOYMENTS_PROVIDER, scope),
            az: providers
                .azure
                .as_ref()
                .map(|a| ProviderEntry::new("AzureResourceManager", &a.scope)),
            aws: providers.aws.as_ref().map(|a| ProviderEntry::new("AWS", &a.scope)),
        }
    }
}

impl ProviderEntry {
    fn new(kind: &str, scope: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: ProviderScope {
                scope: scope.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct DeploymentRequest<'a> {
    properties: DeploymentRequestProperties<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRequestProperties<'a> {
    template: &'a Value,
    parameters: &'a ParameterSet,
    mode: &'static str,
    provider_config: ProviderConfig,
}

#[derive(Debug, Default, Deserialize)]
struct DeploymentResource {
    #[serde(default)]
    properties: Option<DeploymentStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentStatus {
    #[serde(default)]
    provisioning_state: Option<String>,
    #[serde(default)]
    output_resources: Vec<OutputResource>,
    #[serde(default)]
    outputs: Option<Map<String, Value>>,
    #[serde(default)]
    error: Option<ErrorDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputResource {
    #[serde(default)]
    id: Option<String>,
}

/// Deployment client backed by the control plane's HTTP API.
#[derive(Debug, Clone)]
pub struct UcpDeploymentClient {
    client: UcpClient,
    poll_interval: Duration,
    max_polls: u32,
}

impl UcpDeploymentClient {
    /// Creates a deployment client using the default poll interval.
    #[must_use]
    pub const fn new(client: UcpClient) -> Self {
        Self {
            client,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Sets the interval between status polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the maximum number of status polls.
    #[must_use]
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    async fn wait_for_completion(&self, name: &str, id: &str, initial: DeploymentResource) -> Result<DeploymentStatus> {
        let mut current = initial;

        for poll in 0..=self.max_polls {
            let status = current.properties.unwrap_or_default();
            let state = status.provisioning_state.clone().unwrap_or_default();

            match state.to_ascii_lowercase().as_str() {
                "succeeded" => return Ok(status),
                "failed" | "canceled" => {
                    let message = status
                        .error
                        .map_or_else(|| String::from("no error details were returned"), |e| {
                            if e.code.is_empty() {
                                e.message
                            } else {
                                format!("{}: {}", e.code, e.message)
                            }
                        });
                    return Err(DeployError::DeploymentFailed {
                        name: name.to_string(),
                        state,
                        message,
                    }
                    .into());
                }
                _ => {}
            }

            if poll == self.max_polls {
                break;
            }

            debug!("Deployment {name} is {state:?}, polling again");
            tokio::time::sleep(self.poll_interval).await;
            current = self.client.get_resource(id, DEPLOYMENTS_API_VERSION).await?;
        }

        Err(RadError::Management(ManagementError::invalid_response(format!(
            "Deployment {name} did not finish after {} polls",
            self.max_polls
        ))))
    }
}

#[async_trait]
impl DeploymentClient for UcpDeploymentClient {
    async fn deploy(&self, options: &DeploymentOptions) -> Result<DeploymentResult> {
        let name = format!("rad-deploy-{}", Uuid::new_v4());
        let id = format!("{}/providers/{DEPLOYMENTS_TYPE}/{name}", options.scope);
        let started_at = Utc::now();

        info!("{}", options.progress_text);

        let request = DeploymentRequest {
            properties: DeploymentRequestProperties {
                template: &options.template,
                parameters: &options.parameters,
                mode: "Incremental",
                provider_config: ProviderConfig::new(&options.scope, &options.providers),
            },
        };

        let created: Option<DeploymentResource> = self
            .client
            .put_resource(&id, DEPLOYMENTS_API_VERSION, &request)
            .await?;

        let status = self
            .wait_for_completion(&name, &id, created.unwrap_or_default())
            .await?;

        let resources: Vec<String> = status
            .output_resources
            .into_iter()
            .filter_map(|resource| resource.id)
            .collect();
        debug!("Deployment {name} produced {} resource(s)", resources.len());

        info!("{}", options.completion_text);

        Ok(DeploymentResult {
            name,
            resources,
            outputs: status.outputs.unwrap_or_default(),
            started_at,
            completed_at: Utc::now(),
        })
    }
}
