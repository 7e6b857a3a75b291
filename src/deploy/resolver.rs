//! Environment resolution across the two provider namespaces.
//!
//! An environment may live in `Applications.Core` or `Radius.Core`. A full
//! resource ID names its namespace; a bare name is looked up in both and the
//! answers are reconciled.

use tracing::debug;

use crate::error::{found, DeployError, Result};
use crate::management::{ApplicationsCoreEnvironment, ManagementClient, RadiusCoreEnvironment};
use crate::resources::{ProviderNamespace, ResourceId};

/// The environment a deployment targets, tagged by owning namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentCheckResult {
    /// Found in `Applications.Core`.
    ApplicationsCore(ApplicationsCoreEnvironment),
    /// Found in `Radius.Core`.
    RadiusCore(RadiusCoreEnvironment),
}

impl EnvironmentCheckResult {
    /// Returns true if the environment belongs to `Applications.Core`.
    #[must_use]
    pub const fn uses_applications_core(&self) -> bool {
        matches!(self, Self::ApplicationsCore(_))
    }

    /// Returns the owning namespace.
    #[must_use]
    pub const fn namespace(&self) -> ProviderNamespace {
        match self {
            Self::ApplicationsCore(_) => ProviderNamespace::ApplicationsCore,
            Self::RadiusCore(_) => ProviderNamespace::RadiusCore,
        }
    }

    /// Returns the canonical resource ID reported by the control plane.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ApplicationsCore(env) => env.id.as_deref(),
            Self::RadiusCore(env) => env.id.as_deref(),
        }
    }

    /// Returns the environment name reported by the control plane.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ApplicationsCore(env) => env.name.as_deref(),
            Self::RadiusCore(env) => env.name.as_deref(),
        }
    }
}

/// Resolves an environment name or ID against the management API.
#[derive(Debug)]
pub struct EnvironmentResolver<'a, M: ?Sized> {
    client: &'a M,
}

impl<'a, M: ManagementClient + ?Sized> EnvironmentResolver<'a, M> {
    /// Creates a resolver over `client`.
    #[must_use]
    pub const fn new(client: &'a M) -> Self {
        Self { client }
    }

    /// Finds the environment named by `name_or_id`.
    ///
    /// A full resource ID is queried only in its own namespace. A bare name
    /// is queried under `scope` in `Applications.Core` first and then in
    /// `Radius.Core`. Returns `Ok(None)` when nothing was found.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::EnvironmentConflict`] when the name exists in
    /// both namespaces, and any lookup failure other than absence.
    pub async fn resolve(&self, name_or_id: &str, scope: &str) -> Result<Option<EnvironmentCheckResult>> {
        let (applications_core, radius_core) = match ResourceId::parse(name_or_id) {
            Ok(id) => self.lookup_id(&id).await?,
            Err(_) => self.lookup_name(name_or_id, scope).await?,
        };

        match (applications_core, radius_core) {
            (Some(a), Some(r)) => Err(DeployError::EnvironmentConflict {
                name: name_or_id.to_string(),
                applications_core_id: a.id.unwrap_or_default(),
                radius_core_id: r.id.unwrap_or_default(),
            }
            .into()),
            (Some(a), None) => Ok(Some(EnvironmentCheckResult::ApplicationsCore(a))),
            (None, Some(r)) => Ok(Some(EnvironmentCheckResult::RadiusCore(r))),
            (None, None) => Ok(None),
        }
    }

    async fn lookup_id(
        &self,
        id: &ResourceId,
    ) -> Result<(Option<ApplicationsCoreEnvironment>, Option<RadiusCoreEnvironment>)> {
        match ProviderNamespace::for_id(id) {
            ProviderNamespace::ApplicationsCore => {
                debug!("Looking up Applications.Core environment {id}");
                let env = found(self.client.get_applications_core_environment(id.as_str()).await)?;
                Ok((env, None))
            }
            ProviderNamespace::RadiusCore => {
                debug!("Looking up Radius.Core environment {id}");
                let env = found(self.client.get_radius_core_environment(id.as_str()).await)?;
                Ok((None, env))
            }
        }
    }

    async fn lookup_name(
        &self,
        name: &str,
        scope: &str,
    ) -> Result<(Option<ApplicationsCoreEnvironment>, Option<RadiusCoreEnvironment>)> {
        let applications_core_id = ProviderNamespace::ApplicationsCore.environment_id(scope, name);
        let radius_core_id = ProviderNamespace::RadiusCore.environment_id(scope, name);
        debug!("Looking up environment {name} in {scope}");

        let applications_core =
            found(self.client.get_applications_core_environment(&applications_core_id).await)?;
        let radius_core = found(self.client.get_radius_core_environment(&radius_core_id).await)?;

        Ok((applications_core, radius_core))
    }
}
