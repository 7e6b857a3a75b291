//! Management client trait definition.
//!
//! This module defines the remote operations the deploy workflow consumes,
//! so tests can substitute an in-memory implementation.

use async_trait::async_trait;
use tracing::info;

use crate::error::{LookupError, Result};
use crate::resources::ProviderNamespace;

use super::types::{ApplicationResource, ApplicationsCoreEnvironment, RadiusCoreEnvironment};

/// Remote operations against environments and applications.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Gets an `Applications.Core` environment by ID.
    async fn get_applications_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<ApplicationsCoreEnvironment, LookupError>;

    /// Gets a `Radius.Core` environment by ID.
    async fn get_radius_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<RadiusCoreEnvironment, LookupError>;

    /// Gets an application by ID in the given namespace.
    async fn get_application(
        &self,
        namespace: ProviderNamespace,
        id: &str,
    ) -> std::result::Result<ApplicationResource, LookupError>;

    /// Creates or replaces an application.
    async fn create_or_update_application(
        &self,
        namespace: ProviderNamespace,
        id: &str,
        application: &ApplicationResource,
    ) -> Result<()>;

    /// Creates the application bound to `environment_id` unless it already exists.
    ///
    /// Returns true if the application was created.
    async fn create_application_if_not_found(
        &self,
        namespace: ProviderNamespace,
        id: &str,
        environment_id: &str,
    ) -> Result<bool> {
        match self.get_application(namespace, id).await {
            Ok(_) => Ok(false),
            Err(LookupError::NotFound { .. }) => {
                info!("Creating application {id}");
                let application = ApplicationResource::in_environment(environment_id);
                self.create_or_update_application(namespace, id, &application)
                    .await?;
                Ok(true)
            }
            Err(LookupError::Transport(e)) => Err(e.into()),
        }
    }
}
