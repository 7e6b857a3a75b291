//! Resource identifier parsing.
//!
//! Resource IDs look like
//! `/planes/radius/local/resourceGroups/rg/providers/Applications.Core/environments/prod`:
//! a list of scope segments, then `providers`, then one or more typed segments.

use std::fmt;

/// Separator between ID segments.
const SEGMENT_SEPARATOR: char = '/';

/// The segment that marks the start of the typed portion of an ID.
const PROVIDERS_SEGMENT: &str = "providers";

/// The leading segment of a plane-qualified ID.
const PLANES_SEGMENT: &str = "planes";

/// A scope segment such as `resourceGroups/rg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSegment {
    /// Scope type, e.g. `resourceGroups`.
    pub scope_type: String,
    /// Scope name; empty for a collection.
    pub name: String,
}

/// A typed segment such as `Applications.Core/environments/prod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSegment {
    /// Resource type, `Namespace/type` for the first segment.
    pub resource_type: String,
    /// Resource name; empty for a collection.
    pub name: String,
}

/// A parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    /// The ID exactly as supplied, trailing separator removed.
    original: String,
    /// Whether the ID started with `/planes`.
    plane_qualified: bool,
    /// Scope segments before `providers`.
    scopes: Vec<ScopeSegment>,
    /// Typed segments after `providers`.
    types: Vec<TypeSegment>,
}

/// Error returned when a string is not a resource ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid resource id")]
pub struct InvalidResourceId(pub String);

impl ResourceId {
    /// Parses a resource ID.
    ///
    /// A leading `/` is required and a trailing `/` is tolerated. Empty
    /// segments are rejected, as is a dangling `providers` segment.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidResourceId`] if the string is not a resource ID.
    pub fn parse(id: &str) -> Result<Self, InvalidResourceId> {
        let invalid = || InvalidResourceId(id.to_string());

        if !id.starts_with(SEGMENT_SEPARATOR) || id.starts_with("//") {
            return Err(invalid());
        }

        let trimmed = id
            .trim_start_matches(SEGMENT_SEPARATOR)
            .strip_suffix(SEGMENT_SEPARATOR)
            .unwrap_or_else(|| id.trim_start_matches(SEGMENT_SEPARATOR));

        let mut segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(SEGMENT_SEPARATOR).collect()
        };

        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        let plane_qualified = segments
            .first()
            .is_some_and(|s| s.eq_ignore_ascii_case(PLANES_SEGMENT));
        if plane_qualified {
            segments.remove(0);
        }

        let mut scopes = Vec::new();
        let mut i = 0;

        while i < segments.len() {
            if segments[i].eq_ignore_ascii_case(PROVIDERS_SEGMENT) {
                break;
            }

            if segments.len() - i < 2 {
                scopes.push(ScopeSegment {
                    scope_type: segments[i].to_string(),
                    name: String::new(),
                });
                i += 1;
                break;
            }

            if segments[i + 1].eq_ignore_ascii_case(PROVIDERS_SEGMENT) {
                // odd number of scope segments before `providers`
                return Err(invalid());
            }

            scopes.push(ScopeSegment {
                scope_type: segments[i].to_string(),
                name: segments[i + 1].to_string(),
            });
            i += 2;
        }

        let mut types = Vec::new();

        if i < segments.len() && segments[i].eq_ignore_ascii_case(PROVIDERS_SEGMENT) {
            i += 1;
            if segments.len() - i < 2 {
                return Err(invalid());
            }

            types.push(TypeSegment {
                resource_type: format!("{}/{}", segments[i], segments[i + 1]),
                name: segments.get(i + 2).map(|s| (*s).to_string()).unwrap_or_default(),
            });
            i += 3;

            while i < segments.len() {
                if segments[i].eq_ignore_ascii_case(PROVIDERS_SEGMENT) {
                    // extension resources are not addressed by this client
                    return Err(invalid());
                }
                types.push(TypeSegment {
                    resource_type: segments[i].to_string(),
                    name: segments.get(i + 1).map(|s| (*s).to_string()).unwrap_or_default(),
                });
                i += 2;
            }
        } else if i < segments.len() {
            return Err(invalid());
        }

        Ok(Self {
            original: id.strip_suffix(SEGMENT_SEPARATOR).unwrap_or(id).to_string(),
            plane_qualified,
            scopes,
            types,
        })
    }

    /// Returns the namespace of the resource provider, or an empty string
    /// for a scope ID. The casing of the original ID is preserved.
    #[must_use]
    pub fn provider_namespace(&self) -> &str {
        self.types
            .first()
            .and_then(|t| t.resource_type.split(SEGMENT_SEPARATOR).next())
            .unwrap_or("")
    }

    /// Returns the full resource type, e.g. `Applications.Core/environments`.
    #[must_use]
    pub fn resource_type(&self) -> String {
        self.types
            .iter()
            .map(|t| t.resource_type.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Returns the resource name, or the last scope name for a scope ID.
    #[must_use]
    pub fn name(&self) -> &str {
        self.types.last().map_or_else(
            || self.scopes.last().map_or("", |s| s.name.as_str()),
            |t| t.name.as_str(),
        )
    }

    /// Returns true if the ID names a resource rather than a scope.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        self.types.last().is_some_and(|t| !t.name.is_empty())
    }

    /// Returns true if the ID starts with `/planes`.
    #[must_use]
    pub const fn is_plane_qualified(&self) -> bool {
        self.plane_qualified
    }

    /// Returns the scope segments.
    #[must_use]
    pub fn scopes(&self) -> &[ScopeSegment] {
        &self.scopes
    }

    /// Finds the name of the first scope of the given type (case-insensitive).
    #[must_use]
    pub fn find_scope(&self, scope_type: &str) -> Option<&str> {
        self.scopes
            .iter()
            .find(|s| s.scope_type.eq_ignore_ascii_case(scope_type))
            .map(|s| s.name.as_str())
    }

    /// Returns the ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl std::str::FromStr for ResourceId {
    type Err = InvalidResourceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
