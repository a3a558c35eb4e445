//! # Generation Pipeline
//!
//! Chains the stages in their fixed order:
//!
//! 1. aggregate definition providers into a [`DefinitionTable`](crate::definitions::DefinitionTable)
//! 2. build the description document for the requested types
//! 3. flatten and index the document by group/version/kind
//! 4. convert and assemble one schema per descriptor
//!
//! Every run builds its own table, document and index. Any stage failing ends
//! the run with that stage's error.

use crate::api::{ApiResourceSchema, CanonicalTypeName, InternalApi};
use crate::assemble::assemble;
use crate::convert::SchemaConverter;
use crate::definitions::{aggregate_definitions, DefinitionProvider};
use crate::error::Error;
use crate::naming::{DefinitionNamer, Scheme};
use crate::openapi::{build_description, index_models, DescriptionDocument};
use tracing::{info, info_span};

/// Build the description document covering every descriptor's type.
pub fn describe_apis(
    schemes: &[Scheme],
    providers: &[&dyn DefinitionProvider],
    apis: &[InternalApi],
) -> Result<DescriptionDocument, Error> {
    let namer = DefinitionNamer::new(schemes);
    let refs = |canonical: &str| namer.reference(canonical);
    let table = aggregate_definitions(providers, &refs);
    let document = build_description(
        &table,
        &namer,
        apis.iter().map(|api| api.instance.canonical_type_name()),
    )?;
    Ok(document)
}

/// Generate one `APIResourceSchema` per descriptor.
///
/// `schemes` register the group/version/kinds of the host types, `providers`
/// supply their structural definitions and `converter` turns each indexed
/// model into the embedded JSON-schema fragment.
pub fn create_api_resource_schemas<C>(
    schemes: &[Scheme],
    providers: &[&dyn DefinitionProvider],
    apis: &[InternalApi],
    converter: &C,
) -> Result<Vec<ApiResourceSchema>, Error>
where
    C: SchemaConverter + ?Sized,
{
    let span = info_span!("create_api_resource_schemas", apis = apis.len());
    let _enter = span.enter();

    let document = describe_apis(schemes, providers, apis)?;
    let index = index_models(&document)?;
    let schemas = assemble(apis, &index, converter)?;

    info!(
        components = document.component_names().len(),
        kinds = index.len(),
        schemas = schemas.len(),
        "generation complete"
    );
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::api::{GroupVersion, GroupVersionKind, ResourceNames, ResourceScope, TypeRef};
    use crate::convert::{ConversionIssue, JsonSchemaProps, StructuralConverter};
    use crate::definitions::{Definition, ReferenceCallback};
    use crate::error::BuildError;
    use crate::openapi::Model;
    use serde_json::json;
    use std::collections::BTreeMap;

    const WIDGET: &str = "example.io/widgets/v1.Widget";

    fn widget_api() -> InternalApi {
        InternalApi {
            names: ResourceNames {
                plural: "widgets".to_string(),
                singular: "widget".to_string(),
                kind: "Widget".to_string(),
            },
            group_version: GroupVersion::new("", "v1"),
            instance: TypeRef::new(WIDGET),
            scope: ResourceScope::Cluster,
            has_status: true,
        }
    }

    fn scheme() -> Scheme {
        let mut scheme = Scheme::new();
        scheme.add_known_type(GroupVersionKind::new("", "v1", "Widget"), WIDGET);
        scheme
    }

    fn widgets(_: ReferenceCallback<'_>) -> BTreeMap<String, Definition> {
        BTreeMap::from([(
            WIDGET.to_string(),
            Definition::new(json!({
                "type": "object",
                "properties": {"size": {"type": "integer"}}
            })),
        )])
    }

    #[test]
    fn runs_every_stage() {
        let providers: [&dyn DefinitionProvider; 1] = [&widgets];
        let schemas = create_api_resource_schemas(
            &[scheme()],
            &providers,
            &[widget_api()],
            &StructuralConverter::new(),
        )
        .unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name(), "internal.widgets.core");
        assert_eq!(
            schemas[0].spec.versions[0].schema,
            json!({"type": "object", "properties": {"size": {"type": "integer"}}})
        );
    }

    #[test]
    fn build_failures_are_reported() {
        let providers: [&dyn DefinitionProvider; 0] = [];
        let trivial = |_: &Model| -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
            Ok(JsonSchemaProps::default())
        };
        let err =
            create_api_resource_schemas(&[scheme()], &providers, &[widget_api()], &trivial)
                .unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::MissingDefinition { .. })
        ));
    }

    #[test]
    fn unregistered_kind_violates_lookup() {
        let providers: [&dyn DefinitionProvider; 1] = [&widgets];
        let err = create_api_resource_schemas(
            &[],
            &providers,
            &[widget_api()],
            &StructuralConverter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::LookupInvariantViolation { .. }));
    }
}
