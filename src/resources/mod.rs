//! Resource identifiers and provider namespaces.
//!
//! This module parses fully-qualified resource IDs and builds the canonical
//! IDs used to address environments and applications in either namespace.

mod id;
mod namespace;

pub use id::{InvalidResourceId, ResourceId, ScopeSegment, TypeSegment};
pub use namespace::{
    resource_id, ProviderNamespace, APPLICATIONS_CORE, APPLICATIONS_CORE_API_VERSION, RADIUS_CORE,
    RADIUS_CORE_API_VERSION,
};
