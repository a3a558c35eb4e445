//! # Built-in Catalog
//!
//! The types served by default: namespaces, config maps, secrets and service
//! accounts from the core `v1` group, together with the scheme registering
//! their kinds and two providers carrying their structural definitions.
//!
//! Configuration can extend or replace all of this; see
//! [`GeneratorConfig`](crate::config::GeneratorConfig).

mod definitions;

pub use definitions::{core_v1_definitions, meta_v1_definitions};

use crate::api::{GroupVersion, GroupVersionKind, InternalApi, ResourceNames, ResourceScope, TypeRef};
use crate::naming::Scheme;

pub const NAMESPACE: &str = "k8s.io/api/core/v1.Namespace";
pub const NAMESPACE_SPEC: &str = "k8s.io/api/core/v1.NamespaceSpec";
pub const NAMESPACE_STATUS: &str = "k8s.io/api/core/v1.NamespaceStatus";
pub const NAMESPACE_CONDITION: &str = "k8s.io/api/core/v1.NamespaceCondition";
pub const CONFIG_MAP: &str = "k8s.io/api/core/v1.ConfigMap";
pub const SECRET: &str = "k8s.io/api/core/v1.Secret";
pub const SERVICE_ACCOUNT: &str = "k8s.io/api/core/v1.ServiceAccount";
pub const OBJECT_REFERENCE: &str = "k8s.io/api/core/v1.ObjectReference";
pub const LOCAL_OBJECT_REFERENCE: &str = "k8s.io/api/core/v1.LocalObjectReference";
pub const OBJECT_META: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta";
pub const TIME: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.Time";

const CORE_V1: &str = "v1";

fn core_api(
    plural: &str,
    singular: &str,
    kind: &str,
    instance: &str,
    scope: ResourceScope,
    has_status: bool,
) -> InternalApi {
    InternalApi {
        names: ResourceNames {
            plural: plural.to_string(),
            singular: singular.to_string(),
            kind: kind.to_string(),
        },
        group_version: GroupVersion::new("", CORE_V1),
        instance: TypeRef::new(instance),
        scope,
        has_status,
    }
}

/// Descriptors of the built-in APIs, in generation order.
pub fn internal_apis() -> Vec<InternalApi> {
    vec![
        core_api(
            "namespaces",
            "namespace",
            "Namespace",
            NAMESPACE,
            ResourceScope::Cluster,
            true,
        ),
        core_api(
            "configmaps",
            "configmap",
            "ConfigMap",
            CONFIG_MAP,
            ResourceScope::Namespaced,
            false,
        ),
        core_api(
            "secrets",
            "secret",
            "Secret",
            SECRET,
            ResourceScope::Namespaced,
            false,
        ),
        core_api(
            "serviceaccounts",
            "serviceaccount",
            "ServiceAccount",
            SERVICE_ACCOUNT,
            ResourceScope::Namespaced,
            false,
        ),
    ]
}

/// Scheme registering the built-in kinds under core `v1`.
pub fn core_v1_scheme() -> Scheme {
    let mut scheme = Scheme::new();
    for (kind, canonical) in [
        ("Namespace", NAMESPACE),
        ("ConfigMap", CONFIG_MAP),
        ("Secret", SECRET),
        ("ServiceAccount", SERVICE_ACCOUNT),
    ] {
        scheme.add_known_type(GroupVersionKind::new("", CORE_V1, kind), canonical);
    }
    scheme
}
