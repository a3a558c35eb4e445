//! # Schema Assembly
//!
//! Turns each [`InternalApi`] into an [`ApiResourceSchema`] by looking up its
//! model, converting the model to a JSON-schema fragment and wrapping the
//! fragment in a single served, stored `v1` version.

use crate::api::{
    ApiResourceSchema, ApiResourceSchemaSpec, ApiResourceVersion, InternalApi, SubresourceStatus,
    Subresources,
};
use crate::convert::{ConversionErrors, SchemaConverter};
use crate::error::Error;
use crate::openapi::ModelIndex;
use tracing::{debug, info};

/// Name of the single version every generated schema serves.
pub const SCHEMA_VERSION: &str = "v1";

/// Assemble one schema per descriptor, in input order.
///
/// The first descriptor that fails stops the run; no partial output is
/// returned. Duplicate descriptors produce duplicate schemas.
pub fn assemble<C>(
    apis: &[InternalApi],
    index: &ModelIndex,
    converter: &C,
) -> Result<Vec<ApiResourceSchema>, Error>
where
    C: SchemaConverter + ?Sized,
{
    let mut schemas = Vec::with_capacity(apis.len());
    for api in apis {
        let gvk = api.group_version_kind();
        let Some(model) = index.get(&gvk) else {
            return Err(Error::LookupInvariantViolation { gvk });
        };

        let props = converter.convert(model).map_err(|issues| Error::Conversion {
            gvk: gvk.clone(),
            errors: ConversionErrors(issues),
        })?;

        let name = api.schema_name();
        let schema = serde_json::to_value(&props).map_err(|source| Error::SchemaEncoding {
            name: name.clone(),
            source,
        })?;
        let subresources = Subresources {
            status: api.has_status.then_some(SubresourceStatus {}),
        };

        debug!(
            name = %name,
            gvk = %gvk,
            model = %model.name,
            status = api.has_status,
            "assembled resource schema"
        );
        schemas.push(ApiResourceSchema::new(
            name,
            ApiResourceSchemaSpec {
                group: api.group_version.group.clone(),
                names: api.names.clone(),
                scope: api.scope,
                versions: vec![ApiResourceVersion {
                    name: SCHEMA_VERSION.to_string(),
                    served: true,
                    storage: true,
                    schema,
                    subresources,
                }],
            },
        ));
    }
    info!(schemas = schemas.len(), "resource schemas assembled");
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::api::{GroupVersion, ResourceNames, ResourceScope, TypeRef};
    use crate::convert::{ConversionIssue, ConversionIssueKind, JsonSchemaProps};
    use crate::openapi::{models_by_gvk, Model};
    use std::cell::Cell;

    fn api(plural: &str, kind: &str, group: &str, has_status: bool) -> InternalApi {
        InternalApi {
            names: ResourceNames {
                plural: plural.to_string(),
                singular: kind.to_lowercase(),
                kind: kind.to_string(),
            },
            group_version: GroupVersion::new(group, "v1"),
            instance: TypeRef::new(format!("example.io/api/v1.{kind}")),
            scope: ResourceScope::Namespaced,
            has_status,
        }
    }

    fn index(apis: &[InternalApi]) -> ModelIndex {
        let models = apis
            .iter()
            .map(|api| Model {
                name: api.names.kind.clone(),
                schema: serde_json::json!({"type": "object"}),
                group_version_kinds: vec![api.group_version_kind()],
            })
            .collect();
        models_by_gvk(models).unwrap()
    }

    fn object(_: &Model) -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
        Ok(JsonSchemaProps::with_type("object"))
    }

    #[test]
    fn names_follow_group_rule() {
        let apis = vec![
            api("widgets", "Widget", "", true),
            api("gadgets", "Gadget", "example.io", false),
        ];
        let schemas = assemble(&apis, &index(&apis), &object).unwrap();
        assert_eq!(schemas[0].name(), "internal.widgets.core");
        assert_eq!(schemas[0].spec.group, "");
        assert_eq!(schemas[1].name(), "internal.gadgets.example.io");
        assert_eq!(schemas[1].spec.group, "example.io");
    }

    #[test]
    fn status_subresource_follows_descriptor() {
        let apis = vec![
            api("widgets", "Widget", "", true),
            api("gadgets", "Gadget", "", false),
        ];
        let schemas = assemble(&apis, &index(&apis), &object).unwrap();
        for (api, schema) in apis.iter().zip(&schemas) {
            assert_eq!(schema.spec.versions.len(), 1);
            let version = &schema.spec.versions[0];
            assert_eq!(version.name, SCHEMA_VERSION);
            assert!(version.served && version.storage);
            assert_eq!(version.subresources.status.is_some(), api.has_status);
        }

        let value = serde_json::to_value(&schemas[0]).unwrap();
        assert_eq!(
            value["spec"]["versions"][0]["subresources"],
            serde_json::json!({"status": {}})
        );
        let value = serde_json::to_value(&schemas[1]).unwrap();
        assert_eq!(
            value["spec"]["versions"][0]["subresources"],
            serde_json::json!({})
        );
    }

    #[test]
    fn first_conversion_failure_stops_the_run() {
        let apis = vec![
            api("widgets", "Widget", "", false),
            api("gadgets", "Gadget", "", false),
            api("gizmos", "Gizmo", "", false),
        ];
        let calls = Cell::new(0);
        let converter = |model: &Model| -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
            calls.set(calls.get() + 1);
            if model.name == "Gadget" {
                Err(vec![ConversionIssue::new(
                    "Gadget",
                    ConversionIssueKind::MissingType,
                    "no type",
                )])
            } else {
                Ok(JsonSchemaProps::with_type("object"))
            }
        };

        let err = assemble(&apis, &index(&apis), &converter).unwrap_err();
        match err {
            Error::Conversion { gvk, errors } => {
                assert_eq!(gvk.kind, "Gadget");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn missing_model_is_an_invariant_violation() {
        let apis = vec![api("widgets", "Widget", "", false)];
        let err = assemble(&apis, &ModelIndex::default(), &object).unwrap_err();
        assert!(matches!(err, Error::LookupInvariantViolation { gvk } if gvk.kind == "Widget"));
    }

    #[test]
    fn duplicate_descriptors_yield_duplicate_schemas() {
        let widget = api("widgets", "Widget", "", false);
        let apis = vec![widget.clone(), widget];
        let schemas = assemble(&apis, &index(&apis[..1]), &object).unwrap();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0], schemas[1]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let schemas = assemble(&[], &ModelIndex::default(), &object).unwrap();
        assert!(schemas.is_empty());
    }
}
