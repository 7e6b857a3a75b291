//! In-memory clients for deploy workflow tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{LookupError, ManagementError, Result};
use crate::management::{
    ApplicationResource, ApplicationsCoreEnvironment, AzureSubscriptionBinding, ManagementClient,
    RadiusCoreEnvironment, RadiusCoreEnvironmentProperties, RadiusCoreProviders,
};
use crate::resources::{ProviderNamespace, ResourceId};

use super::deployment::{DeploymentClient, DeploymentOptions, DeploymentResult};

/// Management client backed by maps, recording every call in order.
#[derive(Debug, Default)]
pub struct FakeManagementClient {
    applications_core: HashMap<String, ApplicationsCoreEnvironment>,
    radius_core: HashMap<String, RadiusCoreEnvironment>,
    applications: Mutex<HashMap<String, ApplicationResource>>,
    failures: HashSet<String>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<(ProviderNamespace, String, ApplicationResource)>>,
}

fn name_of(id: &str) -> Option<String> {
    ResourceId::parse(id).ok().map(|id| id.name().to_string())
}

impl FakeManagementClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications_core_environment(mut self, id: &str) -> Self {
        self.applications_core.insert(
            id.to_string(),
            ApplicationsCoreEnvironment {
                id: Some(id.to_string()),
                name: name_of(id),
                ..ApplicationsCoreEnvironment::default()
            },
        );
        self
    }

    pub fn with_radius_core_environment(mut self, id: &str, azure: Option<AzureSubscriptionBinding>) -> Self {
        self.radius_core.insert(
            id.to_string(),
            RadiusCoreEnvironment {
                id: Some(id.to_string()),
                name: name_of(id),
                properties: Some(RadiusCoreEnvironmentProperties {
                    providers: Some(RadiusCoreProviders {
                        azure,
                        ..RadiusCoreProviders::default()
                    }),
                    ..RadiusCoreEnvironmentProperties::default()
                }),
                ..RadiusCoreEnvironment::default()
            },
        );
        self
    }

    pub fn with_application(self, id: &str, environment_id: &str) -> Self {
        self.applications
            .lock()
            .expect("lock")
            .insert(id.to_string(), ApplicationResource::in_environment(environment_id));
        self
    }

    pub fn with_failure(mut self, id: &str) -> Self {
        self.failures.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn created(&self) -> Vec<(ProviderNamespace, String, ApplicationResource)> {
        self.created.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn lookup<T: Clone>(&self, map: &HashMap<String, T>, id: &str) -> std::result::Result<T, LookupError> {
        self.record(format!("GET {id}"));
        if self.failures.contains(id) {
            return Err(ManagementError::api_error(500, "injected failure").into());
        }
        map.get(id).cloned().ok_or_else(|| LookupError::not_found(id))
    }
}

#[async_trait]
impl ManagementClient for FakeManagementClient {
    async fn get_applications_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<ApplicationsCoreEnvironment, LookupError> {
        self.lookup(&self.applications_core, id)
    }

    async fn get_radius_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<RadiusCoreEnvironment, LookupError> {
        self.lookup(&self.radius_core, id)
    }

    async fn get_application(
        &self,
        _namespace: ProviderNamespace,
        id: &str,
    ) -> std::result::Result<ApplicationResource, LookupError> {
        let applications = self.applications.lock().expect("lock").clone();
        self.lookup(&applications, id)
    }

    async fn create_or_update_application(
        &self,
        namespace: ProviderNamespace,
        id: &str,
        application: &ApplicationResource,
    ) -> Result<()> {
        self.record(format!("PUT {id}"));
        self.applications
            .lock()
            .expect("lock")
            .insert(id.to_string(), application.clone());
        self.created
            .lock()
            .expect("lock")
            .push((namespace, id.to_string(), application.clone()));
        Ok(())
    }
}

/// Deployment client that records the options it receives.
#[derive(Debug, Default)]
pub struct FakeDeploymentClient {
    deployments: Mutex<Vec<DeploymentOptions>>,
}

impl FakeDeploymentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deployments(&self) -> Vec<DeploymentOptions> {
        self.deployments.lock().expect("lock").clone()
    }
}

#[async_trait]
impl DeploymentClient for FakeDeploymentClient {
    async fn deploy(&self, options: &DeploymentOptions) -> Result<DeploymentResult> {
        self.deployments.lock().expect("lock").push(options.clone());
        let now = Utc::now();
        Ok(DeploymentResult {
            name: String::from("rad-deploy-test"),
            resources: Vec::new(),
            outputs: serde_json::Map::new(),
            started_at: now,
            completed_at: now,
        })
    }
}
