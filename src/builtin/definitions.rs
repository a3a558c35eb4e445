use super::{
    CONFIG_MAP, LOCAL_OBJECT_REFERENCE, NAMESPACE, NAMESPACE_CONDITION, NAMESPACE_SPEC,
    NAMESPACE_STATUS, OBJECT_META, OBJECT_REFERENCE, SECRET, SERVICE_ACCOUNT, TIME,
};
use crate::definitions::{Definition, ReferenceCallback};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn string_map(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "additionalProperties": {"type": "string"}
    })
}

fn type_meta() -> [(&'static str, Value); 2] {
    [
        (
            "apiVersion",
            string("Versioned schema of this representation of an object."),
        ),
        (
            "kind",
            string("REST resource this object represents."),
        ),
    ]
}

/// Object schema with the type meta fields followed by `fields`.
fn top_level(description: &str, fields: Vec<(&'static str, Value)>) -> Value {
    let properties: serde_json::Map<String, Value> = type_meta()
        .into_iter()
        .chain(fields)
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "description": description,
        "properties": properties
    })
}

/// Structural definitions of the core `v1` types.
pub fn core_v1_definitions(refs: ReferenceCallback<'_>) -> BTreeMap<String, Definition> {
    let metadata = json!({
        "$ref": refs(OBJECT_META),
        "description": "Standard object's metadata."
    });

    let mut definitions = BTreeMap::new();
    definitions.insert(
        NAMESPACE.to_string(),
        Definition::new(top_level(
            "Namespace provides a scope for Names.",
            vec![
                ("metadata", metadata.clone()),
                (
                    "spec",
                    json!({"$ref": refs(NAMESPACE_SPEC), "description": "Behavior of the Namespace."}),
                ),
                (
                    "status",
                    json!({"$ref": refs(NAMESPACE_STATUS), "description": "Current status of the Namespace."}),
                ),
            ],
        ))
        .with_dependencies([OBJECT_META, NAMESPACE_SPEC, NAMESPACE_STATUS]),
    );
    definitions.insert(
        NAMESPACE_SPEC.to_string(),
        Definition::new(json!({
            "type": "object",
            "description": "NamespaceSpec describes the attributes on a Namespace.",
            "properties": {
                "finalizers": {
                    "type": "array",
                    "description": "Values that must be empty before the namespace is removed from storage.",
                    "items": {"type": "string"},
                    "x-kubernetes-list-type": "atomic"
                }
            }
        })),
    );
    definitions.insert(
        NAMESPACE_STATUS.to_string(),
        Definition::new(json!({
            "type": "object",
            "description": "NamespaceStatus is information about the current status of a Namespace.",
            "properties": {
                "phase": {
                    "type": "string",
                    "description": "Current lifecycle phase of the namespace.",
                    "enum": ["Active", "Terminating"]
                },
                "conditions": {
                    "type": "array",
                    "description": "Latest available observations of a namespace's current state.",
                    "items": {"$ref": refs(NAMESPACE_CONDITION)},
                    "x-kubernetes-list-type": "map",
                    "x-kubernetes-list-map-keys": ["type"]
                }
            }
        }))
        .with_dependencies([NAMESPACE_CONDITION]),
    );
    definitions.insert(
        NAMESPACE_CONDITION.to_string(),
        Definition::new(json!({
            "type": "object",
            "description": "NamespaceCondition contains details about state of namespace.",
            "required": ["type", "status"],
            "properties": {
                "type": string("Type of namespace controller condition."),
                "status": string("Status of the condition, one of True, False, Unknown."),
                "lastTransitionTime": {"$ref": refs(TIME)},
                "reason": string("Machine-readable reason for the last transition."),
                "message": string("Human-readable message about the last transition.")
            }
        }))
        .with_dependencies([TIME]),
    );
    definitions.insert(
        CONFIG_MAP.to_string(),
        Definition::new(top_level(
            "ConfigMap holds configuration data for pods to consume.",
            vec![
                ("metadata", metadata.clone()),
                (
                    "data",
                    string_map("Configuration data. Keys must be valid file names."),
                ),
                (
                    "binaryData",
                    json!({
                        "type": "object",
                        "description": "Binary configuration data.",
                        "additionalProperties": {"type": "string", "format": "byte"}
                    }),
                ),
                (
                    "immutable",
                    json!({
                        "type": "boolean",
                        "description": "Data stored in the ConfigMap cannot be updated when set."
                    }),
                ),
            ],
        ))
        .with_dependencies([OBJECT_META]),
    );
    definitions.insert(
        SECRET.to_string(),
        Definition::new(top_level(
            "Secret holds secret data of a certain type.",
            vec![
                ("metadata", metadata.clone()),
                (
                    "data",
                    json!({
                        "type": "object",
                        "description": "Secret data, base64 encoded.",
                        "additionalProperties": {"type": "string", "format": "byte"}
                    }),
                ),
                (
                    "stringData",
                    string_map("Write-only convenience field for non-binary secret data."),
                ),
                ("type", string("Used to facilitate programmatic handling of secret data.")),
                (
                    "immutable",
                    json!({
                        "type": "boolean",
                        "description": "Data stored in the Secret cannot be updated when set."
                    }),
                ),
            ],
        ))
        .with_dependencies([OBJECT_META]),
    );
    definitions.insert(
        SERVICE_ACCOUNT.to_string(),
        Definition::new(top_level(
            "ServiceAccount binds together a name, a principal and a set of secrets.",
            vec![
                ("metadata", metadata),
                (
                    "secrets",
                    json!({
                        "type": "array",
                        "description": "Secrets in the same namespace this service account may use.",
                        "items": {"$ref": refs(OBJECT_REFERENCE)}
                    }),
                ),
                (
                    "imagePullSecrets",
                    json!({
                        "type": "array",
                        "description": "Secrets used to pull images for pods referencing this service account.",
                        "items": {"$ref": refs(LOCAL_OBJECT_REFERENCE)},
                        "x-kubernetes-list-type": "atomic"
                    }),
                ),
                (
                    "automountServiceAccountToken",
                    json!({
                        "type": "boolean",
                        "description": "Whether pods should have an API token mounted automatically."
                    }),
                ),
            ],
        ))
        .with_dependencies([OBJECT_META, OBJECT_REFERENCE, LOCAL_OBJECT_REFERENCE]),
    );
    definitions.insert(
        OBJECT_REFERENCE.to_string(),
        Definition::new(json!({
            "type": "object",
            "description": "ObjectReference contains enough information to inspect or modify the referred object.",
            "x-kubernetes-map-type": "atomic",
            "properties": {
                "apiVersion": string("API version of the referent."),
                "kind": string("Kind of the referent."),
                "namespace": string("Namespace of the referent."),
                "name": string("Name of the referent."),
                "uid": string("UID of the referent."),
                "resourceVersion": string("Specific resourceVersion to which this reference is made."),
                "fieldPath": string("Piece of the object the reference points at.")
            }
        })),
    );
    definitions.insert(
        LOCAL_OBJECT_REFERENCE.to_string(),
        Definition::new(json!({
            "type": "object",
            "description": "LocalObjectReference locates the referenced object inside the same namespace.",
            "x-kubernetes-map-type": "atomic",
            "properties": {
                "name": string("Name of the referent.")
            }
        })),
    );
    definitions
}

/// Structural definitions of the shared object metadata types.
pub fn meta_v1_definitions(refs: ReferenceCallback<'_>) -> BTreeMap<String, Definition> {
    BTreeMap::from([
        (
            OBJECT_META.to_string(),
            Definition::new(json!({
                "type": "object",
                "description": "ObjectMeta is metadata that all persisted resources must have.",
                "properties": {
                    "name": string("Name must be unique within a namespace."),
                    "generateName": string("Optional prefix used by the server to generate a unique name."),
                    "namespace": string("Namespace defines the space within which each name must be unique."),
                    "uid": string("Unique in time and space value for this object."),
                    "resourceVersion": string("Opaque value that represents the internal version of this object."),
                    "generation": {
                        "type": "integer",
                        "format": "int64",
                        "description": "Sequence number representing a specific generation of the desired state."
                    },
                    "creationTimestamp": {"$ref": refs(TIME)},
                    "labels": string_map("Map of string keys and values used to organize and categorize objects."),
                    "annotations": string_map("Unstructured key value map stored with a resource."),
                    "finalizers": {
                        "type": "array",
                        "items": {"type": "string"},
                        "x-kubernetes-list-type": "set"
                    }
                }
            }))
            .with_dependencies([TIME]),
        ),
        (
            TIME.to_string(),
            Definition::new(json!({
                "type": "string",
                "format": "date-time",
                "description": "Time is a wrapper around time.Time which supports correct marshaling to YAML and JSON."
            })),
        ),
    ])
}
