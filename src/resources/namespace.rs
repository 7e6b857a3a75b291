//! The two provider namespaces an environment can live in.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::ResourceId;

/// Namespace of the original environment and application types.
pub const APPLICATIONS_CORE: &str = "Applications.Core";

/// Namespace of the newer environment and application types.
pub const RADIUS_CORE: &str = "Radius.Core";

/// API version served by the Applications.Core provider.
pub const APPLICATIONS_CORE_API_VERSION: &str = "2023-10-01-preview";

/// API version served by the Radius.Core provider.
pub const RADIUS_CORE_API_VERSION: &str = "2025-08-01-preview";

/// A resource-provider namespace that can own environments and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderNamespace {
    /// `Applications.Core`.
    #[serde(rename = "Applications.Core")]
    ApplicationsCore,
    /// `Radius.Core`.
    #[serde(rename = "Radius.Core")]
    RadiusCore,
}

impl ProviderNamespace {
    /// Returns the canonical namespace name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationsCore => APPLICATIONS_CORE,
            Self::RadiusCore => RADIUS_CORE,
        }
    }

    /// Returns the API version to use against this namespace.
    #[must_use]
    pub const fn api_version(self) -> &'static str {
        match self {
            Self::ApplicationsCore => APPLICATIONS_CORE_API_VERSION,
            Self::RadiusCore => RADIUS_CORE_API_VERSION,
        }
    }

    /// Selects the namespace that serves a parsed resource ID.
    ///
    /// Anything that is not `Applications.Core` (case-insensitive) is
    /// routed to `Radius.Core`.
    #[must_use]
    pub fn for_id(id: &ResourceId) -> Self {
        if id.provider_namespace().eq_ignore_ascii_case(APPLICATIONS_CORE) {
            Self::ApplicationsCore
        } else {
            Self::RadiusCore
        }
    }

    /// Builds the canonical environment ID for `name` under `scope`.
    #[must_use]
    pub fn environment_id(self, scope: &str, name: &str) -> String {
        resource_id(scope, self.as_str(), "environments", name)
    }
}

impl fmt::Display for ProviderNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins a scope, namespace, type and name into a resource ID.
///
/// `namespace` is taken verbatim so callers can preserve the casing found in
/// another ID.
#[must_use]
pub fn resource_id(scope: &str, namespace: &str, resource_type: &str, name: &str) -> String {
    format!("{scope}/providers/{namespace}/{resource_type}/{name}")
}
