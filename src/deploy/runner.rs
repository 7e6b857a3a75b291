//! The `rad deploy` workflow.
//!
//! [`DeployRunner::validate`] settles every input of a deployment (scope,
//! template, environment, application, parameters) and
//! [`DeployRunner::run`] bootstraps the application and submits the
//! deployment.

use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{read_application, require_environment, require_scope, Workspace};
use crate::error::{DeployError, Result};
use crate::management::ManagementClient;
use crate::template::{
    contains_environment_resource, inject_application, inject_environment,
    report_missing_parameters, ParameterParser, ParameterSet, TemplateLoader,
};

use super::deployment::{DeploymentClient, DeploymentOptions, DeploymentResult};
use super::providers::{configure, Providers};
use super::resolver::{EnvironmentCheckResult, EnvironmentResolver};

/// Message shown once a deployment finishes.
pub const COMPLETION_TEXT: &str = "Deployment Complete";

/// Inputs of a deploy command as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    /// Template file.
    pub file: PathBuf,
    /// `--group`.
    pub group: Option<String>,
    /// `--environment`.
    pub environment: Option<String>,
    /// `--application`.
    pub application: Option<String>,
    /// `--parameters`, in order.
    pub parameters: Vec<String>,
}

/// A deployment whose inputs have all been resolved.
#[derive(Debug, Clone)]
pub struct ValidatedDeployment {
    /// Template path as given by the user.
    pub file_path: String,
    /// Workspace with its scope and environment settled.
    pub workspace: Workspace,
    /// Compiled template.
    pub template: Value,
    /// Environment name or ID; the canonical ID once resolved, empty when
    /// the template creates its own environment.
    pub environment_name_or_id: String,
    /// Application name, empty when none is set.
    pub application_name: String,
    /// The resolved environment.
    pub environment: Option<EnvironmentCheckResult>,
    /// Provider settings.
    pub providers: Providers,
    /// Parameters from `--parameters`.
    pub parameters: ParameterSet,
}

impl ValidatedDeployment {
    /// Returns the message shown while the deployment runs.
    #[must_use]
    pub fn progress_text(&self) -> String {
        if self.application_name.is_empty() {
            format!(
                "Deploying template '{}' into environment '{}' from workspace '{}'...\n\nDeployment In Progress...",
                self.file_path, self.environment_name_or_id, self.workspace.name
            )
        } else {
            format!(
                "Deploying template '{}' for application '{}' and environment '{}' from workspace '{}'...\n\nDeployment In Progress... ",
                self.file_path, self.application_name, self.environment_name_or_id, self.workspace.name
            )
        }
    }
}

/// Runs deployments against a management client and a deployment client.
#[derive(Debug)]
pub struct DeployRunner<M, D> {
    management: M,
    deployer: D,
    loader: TemplateLoader,
    parser: ParameterParser,
}

impl<M: ManagementClient, D: DeploymentClient> DeployRunner<M, D> {
    /// Creates a runner with the default template loader.
    #[must_use]
    pub fn new(management: M, deployer: D) -> Self {
        Self {
            management,
            deployer,
            loader: TemplateLoader::new(),
            parser: ParameterParser::new(),
        }
    }

    /// Uses the given template loader.
    #[must_use]
    pub fn with_loader(mut self, loader: TemplateLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Returns the management client.
    #[must_use]
    pub const fn management(&self) -> &M {
        &self.management
    }

    /// Returns the deployment client.
    #[must_use]
    pub const fn deployer(&self) -> &D {
        &self.deployer
    }

    /// Resolves every input of the deployment.
    ///
    /// An environment is required unless the template creates one and none
    /// was given on the command line or in the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if no scope is set, the template cannot be
    /// prepared, a required environment is missing or does not exist, the
    /// environment name is ambiguous, or `--parameters` is malformed.
    pub async fn validate(&self, mut workspace: Workspace, request: &DeployRequest) -> Result<ValidatedDeployment> {
        workspace.scope = require_scope(&workspace, request.group.as_deref())?;

        let file_path = request.file.display().to_string();
        let template = self.loader.prepare(&request.file).await?;

        let environment_given = request.environment.as_deref().is_some_and(|e| !e.is_empty())
            || !workspace.environment.is_empty();
        let creates_environment = contains_environment_resource(&template);

        let mut environment_name_or_id = if !creates_environment || environment_given {
            require_environment(&workspace, request.environment.as_deref())?
        } else {
            debug!("Template {file_path} creates its own environment");
            String::new()
        };

        let application_name = read_application(&workspace, request.application.as_deref());

        let environment = if environment_name_or_id.is_empty() {
            None
        } else {
            let resolved = EnvironmentResolver::new(&self.management)
                .resolve(&environment_name_or_id, &workspace.scope)
                .await?
                .ok_or_else(|| DeployError::EnvironmentNotFound {
                    name: environment_name_or_id.clone(),
                    scope: workspace.scope.clone(),
                })?;

            if let Some(id) = resolved.id() {
                environment_name_or_id = id.to_string();
            }
            Some(resolved)
        };

        let providers = configure(environment.as_ref(), &application_name, &workspace.scope);
        if !providers.radius.environment_id.is_empty() {
            workspace.environment.clone_from(&providers.radius.environment_id);
        }

        let parameters = self.parser.parse(&request.parameters)?;

        Ok(ValidatedDeployment {
            file_path,
            workspace,
            template,
            environment_name_or_id,
            application_name,
            environment,
            providers,
            parameters,
        })
    }

    /// Injects computed parameters, checks for missing ones, creates the
    /// application if needed, and deploys.
    ///
    /// The application is only created when an environment was resolved; a
    /// template that creates its own environment skips this step.
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are missing, the application cannot
    /// be created, or the deployment fails.
    pub async fn run(&self, deployment: ValidatedDeployment) -> Result<DeploymentResult> {
        let template = &deployment.template;
        let providers = &deployment.providers;
        let mut parameters = deployment.parameters.clone();

        let environment_id = providers.radius.environment_id.as_str();
        let application_id = providers.radius.application_id.as_str();

        if !environment_id.is_empty() {
            inject_environment(template, &mut parameters, environment_id);
        }
        if !application_id.is_empty() {
            inject_application(template, &mut parameters, application_id);
        }

        report_missing_parameters(&deployment.file_path, template, &parameters)?;

        if !deployment.application_name.is_empty() && !environment_id.is_empty() {
            if let Some(environment) = &deployment.environment {
                let created = self
                    .management
                    .create_application_if_not_found(environment.namespace(), application_id, environment_id)
                    .await?;
                if created {
                    info!("Created application {}", deployment.application_name);
                }
            }
        }

        let options = DeploymentOptions {
            scope: deployment.workspace.scope.clone(),
            template: template.clone(),
            parameters,
            providers: providers.clone(),
            progress_text: deployment.progress_text(),
            completion_text: COMPLETION_TEXT.to_string(),
        };

        self.deployer.deploy(&options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::fakes::{FakeDeploymentClient, FakeManagementClient};
    use crate::error::RadError;
    use crate::management::AzureSubscriptionBinding;
    use crate::resources::ProviderNamespace;
    use serde_json::json;
    use tempfile::TempDir;

    const SCOPE: &str = "/planes/radius/local/resourceGroups/test-rg";
    const APPLICATIONS_CORE_ENV: &str =
        "/planes/radius/local/resourceGroups/test-rg/providers/Applications.Core/environments/prod";
    const RADIUS_CORE_ENV: &str =
        "/planes/radius/local/resourceGroups/test-rg/providers/Radius.Core/environments/prod";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().expect("temp dir"),
            }
        }

        fn template(&self, template: &Value) -> PathBuf {
            let path = self.dir.path().join("app.json");
            std::fs::write(&path, template.to_string()).expect("write template");
            path
        }
    }

    fn workspace() -> Workspace {
        Workspace {
            name: String::from("test-workspace"),
            scope: SCOPE.to_string(),
            ..Workspace::default()
        }
    }

    fn runner(client: FakeManagementClient) -> DeployRunner<FakeManagementClient, FakeDeploymentClient> {
        DeployRunner::new(client, FakeDeploymentClient::new())
    }

    fn app_template() -> Value {
        json!({
            "parameters": { "environment": {}, "application": {} },
            "resources": {
                "web": { "type": "Applications.Core/containers@2023-10-01-preview" }
            }
        })
    }

    #[tokio::test]
    async fn test_validate_resolves_environment_name() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            environment: Some(String::from("prod")),
            application: Some(String::from("web")),
            parameters: vec![String::from("image=nginx")],
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new().with_applications_core_environment(APPLICATIONS_CORE_ENV));

        let deployment = runner.validate(workspace(), &request).await.expect("validate");

        assert_eq!(deployment.environment_name_or_id, APPLICATIONS_CORE_ENV);
        assert_eq!(deployment.workspace.environment, APPLICATIONS_CORE_ENV);
        assert!(deployment.environment.as_ref().is_some_and(EnvironmentCheckResult::uses_applications_core));
        assert_eq!(deployment.providers.radius.environment_id, APPLICATIONS_CORE_ENV);
        assert_eq!(
            deployment.providers.radius.application_id,
            format!("{SCOPE}/providers/Applications.Core/applications/web")
        );
        assert_eq!(deployment.parameters.get("image"), Some(&json!({ "value": "nginx" })));
    }

    #[tokio::test]
    async fn test_validate_group_overrides_scope() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            group: Some(String::from("other")),
            environment: Some(String::from("prod")),
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new());

        let error = runner.validate(workspace(), &request).await.expect_err("not found");

        assert_eq!(
            error.to_string(),
            "The environment \"prod\" does not exist in scope \"/planes/radius/local/resourceGroups/other\". \
             Run `rad env create` first. You could also provide the environment ID if the environment exists in a different group."
        );
        assert_eq!(
            runner.management().calls(),
            vec![
                String::from("GET /planes/radius/local/resourceGroups/other/providers/Applications.Core/environments/prod"),
                String::from("GET /planes/radius/local/resourceGroups/other/providers/Radius.Core/environments/prod"),
            ]
        );
    }

    #[tokio::test]
    async fn test_validate_requires_environment() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            ..DeployRequest::default()
        };

        let error = runner(FakeManagementClient::new())
            .validate(workspace(), &request)
            .await
            .expect_err("no environment");

        assert!(matches!(error, RadError::Deploy(DeployError::EnvironmentRequired)));
    }

    #[tokio::test]
    async fn test_validate_template_creates_environment() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&json!({
                "resources": {
                    "env": { "type": "Radius.Core/environments@2025-08-01-preview" }
                }
            })),
            application: Some(String::from("web")),
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new());

        let deployment = runner.validate(workspace(), &request).await.expect("validate");

        assert!(deployment.environment_name_or_id.is_empty());
        assert!(deployment.environment.is_none());
        assert_eq!(deployment.providers, Providers::default());
        assert!(runner.management().calls().is_empty());

        runner.run(deployment).await.expect("deploy");

        assert!(runner.management().created().is_empty());
        assert_eq!(runner.deployer().deployments().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_reports_compile_failure() {
        let fixture = Fixture::new();
        let file = fixture.dir.path().join("app.bicep");
        std::fs::write(&file, "resource app 'Applications.Core/applications@2023-10-01-preview' = {}")
            .expect("write template");
        let request = DeployRequest {
            file,
            environment: Some(String::from("prod")),
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new())
            .with_loader(TemplateLoader::new().with_bicep(fixture.dir.path().join("no-such-bicep")));

        let error = runner.validate(workspace(), &request).await.expect_err("compile failure");

        assert!(matches!(error, RadError::Template(crate::error::TemplateError::CompileFailed { .. })));
        assert!(runner.management().calls().is_empty());
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_parameters() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            environment: Some(String::from("prod")),
            parameters: vec![String::from("no-equals-sign")],
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new().with_applications_core_environment(APPLICATIONS_CORE_ENV));

        assert!(runner.validate(workspace(), &request).await.is_err());
    }

    #[tokio::test]
    async fn test_run_injects_parameters_and_deploys() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            environment: Some(String::from("prod")),
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new().with_applications_core_environment(APPLICATIONS_CORE_ENV));
        let mut deployment = runner.validate(workspace(), &request).await.expect("validate");
        deployment.parameters.set_value("application", "provided-by-user");

        runner.run(deployment).await.expect("deploy");

        let deployments = runner.deployer().deployments();
        assert_eq!(deployments.len(), 1);
        let options = &deployments[0];
        assert_eq!(options.scope, SCOPE);
        assert_eq!(
            options.parameters.get("environment"),
            Some(&json!({ "value": APPLICATIONS_CORE_ENV }))
        );
        assert_eq!(
            options.parameters.get("application"),
            Some(&json!({ "value": "provided-by-user" }))
        );
        assert_eq!(
            options.progress_text,
            format!(
                "Deploying template '{}' into environment '{APPLICATIONS_CORE_ENV}' from workspace 'test-workspace'...\n\nDeployment In Progress...",
                request.file.display()
            )
        );
        assert_eq!(options.completion_text, COMPLETION_TEXT);
    }

    #[tokio::test]
    async fn test_run_reports_missing_parameters() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&json!({
                "parameters": {
                    "environment": {},
                    "application": {},
                    "location": {},
                    "replicas": { "defaultValue": 1 }
                }
            })),
            environment: Some(String::from("prod")),
            ..DeployRequest::default()
        };
        let runner = runner(FakeManagementClient::new().with_applications_core_environment(APPLICATIONS_CORE_ENV));
        let deployment = runner.validate(workspace(), &request).await.expect("validate");

        let error = runner.run(deployment).await.expect_err("missing parameters");

        assert_eq!(
            error.to_string(),
            format!(
                "The template \"{}\" could not be deployed because of the following errors:\n\n\
                 \x20 - The template requires an application. Use --application to specify the application name.\n\
                 \x20 - The template requires a parameter \"location\". Use --parameters location=<value> to specify the value.",
                request.file.display()
            )
        );
        assert!(runner.deployer().deployments().is_empty());
    }

    #[tokio::test]
    async fn test_run_creates_application_in_environment_namespace() {
        let fixture = Fixture::new();
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            environment: Some(String::from("prod")),
            application: Some(String::from("web")),
            ..DeployRequest::default()
        };
        let azure = AzureSubscriptionBinding {
            subscription_id: Some(String::from("sub")),
            resource_group_name: Some(String::from("rg")),
        };
        let runner = runner(FakeManagementClient::new().with_radius_core_environment(RADIUS_CORE_ENV, Some(azure)));
        let deployment = runner.validate(workspace(), &request).await.expect("validate");

        runner.run(deployment).await.expect("deploy");

        let app_id = format!("{SCOPE}/providers/Radius.Core/applications/web");
        let created = runner.management().created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, ProviderNamespace::RadiusCore);
        assert_eq!(created[0].1, app_id);
        assert_eq!(created[0].2.properties.environment, RADIUS_CORE_ENV);

        let options = &runner.deployer().deployments()[0];
        assert_eq!(
            options.providers.azure.as_ref().map(|a| a.scope.as_str()),
            Some("/planes/azure/azure/Subscriptions/sub/ResourceGroups/rg")
        );
        assert_eq!(options.parameters.get("application"), Some(&json!({ "value": app_id })));
        assert!(options.progress_text.starts_with(&format!(
            "Deploying template '{}' for application 'web' and environment '{RADIUS_CORE_ENV}'",
            request.file.display()
        )));
    }

    #[tokio::test]
    async fn test_run_keeps_existing_application() {
        let fixture = Fixture::new();
        let app_id = format!("{SCOPE}/providers/Applications.Core/applications/web");
        let request = DeployRequest {
            file: fixture.template(&app_template()),
            environment: Some(APPLICATIONS_CORE_ENV.to_string()),
            application: Some(String::from("web")),
            ..DeployRequest::default()
        };
        let runner = runner(
            FakeManagementClient::new()
                .with_applications_core_environment(APPLICATIONS_CORE_ENV)
                .with_application(&app_id, APPLICATIONS_CORE_ENV),
        );
        let deployment = runner.validate(workspace(), &request).await.expect("validate");

        runner.run(deployment).await.expect("deploy");

        assert!(runner.management().created().is_empty());
        assert_eq!(
            runner.management().calls(),
            vec![format!("GET {APPLICATIONS_CORE_ENV}"), format!("GET {app_id}")]
        );
    }
}
