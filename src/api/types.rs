use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// API version stamped on every generated [`ApiResourceSchema`].
pub const API_RESOURCE_SCHEMA_API_VERSION: &str = "apis.kcp.io/v1alpha1";
/// Kind stamped on every generated [`ApiResourceSchema`].
pub const API_RESOURCE_SCHEMA_KIND: &str = "APIResourceSchema";

/// Plural, singular and kind names of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNames {
    pub plural: String,
    pub singular: String,
    pub kind: String,
}

/// API group and version. An empty group is the core group.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupVersion {
    #[serde(default)]
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Combine with a kind into a lookup key.
    pub fn with_kind(&self, kind: impl Into<String>) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }
}

/// (group, version, kind) triple, the key of the model index.
///
/// Serializes the same way as entries of the `x-kubernetes-group-version-kind`
/// OpenAPI extension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}, Kind={}", self.version, self.kind)
        } else {
            write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
        }
    }
}

/// Whether instances of a resource live inside a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceScope {
    #[serde(rename = "Cluster")]
    Cluster,
    #[serde(rename = "Namespaced")]
    Namespaced,
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceScope::Cluster => write!(f, "Cluster"),
            ResourceScope::Namespaced => write!(f, "Namespaced"),
        }
    }
}

/// Anything that can name its own type for definition lookup.
pub trait CanonicalTypeName {
    /// Globally unique type name, e.g. `k8s.io/api/core/v1.Namespace`.
    fn canonical_type_name(&self) -> &str;
}

/// Reference to a host type by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self(canonical_name.into())
    }
}

impl CanonicalTypeName for TypeRef {
    fn canonical_type_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptor of a built-in type that should be served as an API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalApi {
    pub names: ResourceNames,
    pub group_version: GroupVersion,
    pub instance: TypeRef,
    pub scope: ResourceScope,
    #[serde(default)]
    pub has_status: bool,
}

impl InternalApi {
    /// Key used to find this API's model in the index.
    pub fn group_version_kind(&self) -> GroupVersionKind {
        self.group_version.with_kind(self.names.kind.as_str())
    }

    /// `internal.<plural>.<group>`, with the core group spelled `core`.
    pub fn schema_name(&self) -> String {
        let group = if self.group_version.group.is_empty() {
            "core"
        } else {
            self.group_version.group.as_str()
        };
        format!("internal.{}.{}", self.names.plural, group)
    }
}

/// Minimal object metadata carried by generated schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

/// A versioned, servable schema for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceSchema {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: ApiResourceSchemaSpec,
}

impl ApiResourceSchema {
    pub fn new(name: impl Into<String>, spec: ApiResourceSchemaSpec) -> Self {
        Self {
            api_version: API_RESOURCE_SCHEMA_API_VERSION.to_string(),
            kind: API_RESOURCE_SCHEMA_KIND.to_string(),
            metadata: ObjectMeta { name: name.into() },
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceSchemaSpec {
    pub group: String,
    pub names: ResourceNames,
    pub scope: ResourceScope,
    pub versions: Vec<ApiResourceVersion>,
}

/// One served version of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceVersion {
    pub name: String,
    pub served: bool,
    pub storage: bool,
    /// Raw JSON schema fragment.
    pub schema: Value,
    /// Always serialized; `{}` when no subresource is enabled.
    #[serde(default)]
    pub subresources: Subresources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subresources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubresourceStatus>,
}

/// Marker enabling the `/status` subresource. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubresourceStatus {}
