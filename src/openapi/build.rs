use super::DescriptionDocument;
use crate::definitions::DefinitionTable;
use crate::error::BuildError;
use crate::naming::{DefinitionNamer, COMPONENT_REF_PREFIX};
use oas3::OpenApiV3Spec;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info};

/// Version stamped into `info.version` of every description document.
pub const DOCUMENT_VERSION: &str = "1.0";
/// Title of every description document.
pub const DOCUMENT_TITLE: &str = "Internal APIs";
/// OpenAPI version of the description document.
pub const OPENAPI_VERSION: &str = "3.1.0";
/// Extension listing the group/version/kinds a component is served as.
pub const GVK_EXTENSION: &str = "x-kubernetes-group-version-kind";

/// Build a description document covering `canonical_names` and everything
/// they depend on.
///
/// Duplicate names are collapsed. Fails without producing a document when a
/// requested or dependent name is missing from `table`, when two canonical
/// names share a component name, or when a `$ref` points outside the document.
pub fn build_description<'a, I>(
    table: &DefinitionTable,
    namer: &DefinitionNamer,
    canonical_names: I,
) -> Result<DescriptionDocument, BuildError>
where
    I: IntoIterator<Item = &'a str>,
{
    let requested: BTreeSet<&str> = canonical_names.into_iter().collect();

    let mut components: BTreeMap<String, Value> = BTreeMap::new();
    // component name -> canonical name it was built from
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<(String, Option<String>)> = requested
        .iter()
        .map(|name| (name.to_string(), None))
        .collect();

    while let Some((name, required_by)) = queue.pop_front() {
        if !visited.insert(name.clone()) {
            continue;
        }
        let definition = match (table.get(&name), required_by) {
            (Some(definition), _) => definition,
            (None, None) => return Err(BuildError::MissingDefinition { name }),
            (None, Some(required_by)) => {
                return Err(BuildError::UnresolvedDependency { name, required_by })
            }
        };

        let mut schema = definition.schema.clone();
        let Value::Object(obj) = &mut schema else {
            return Err(BuildError::InvalidDefinition { name });
        };
        let gvks = namer.group_version_kinds(&name);
        if !gvks.is_empty() {
            let extension = serde_json::to_value(gvks).map_err(BuildError::InvalidDocument)?;
            obj.insert(GVK_EXTENSION.to_string(), extension);
        }

        for dependency in &definition.dependencies {
            if !visited.contains(dependency) {
                queue.push_back((dependency.clone(), Some(name.clone())));
            }
        }

        let component = namer.definition_name(&name);
        debug!(
            canonical_name = %name,
            component = %component,
            group_version_kinds = gvks.len(),
            "added component to description document"
        );
        if let Some(first) = owners.insert(component.clone(), name.clone()) {
            return Err(BuildError::ComponentNameConflict {
                component,
                first,
                second: name,
            });
        }
        components.insert(component, schema);
    }

    check_references(&components)?;
    let component_count = components.len();

    let document = json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": DOCUMENT_TITLE,
            "version": DOCUMENT_VERSION,
        },
        "components": {
            "schemas": &components,
        },
    });
    let spec: OpenApiV3Spec =
        serde_json::from_value(document).map_err(BuildError::InvalidDocument)?;

    info!(
        requested = requested.len(),
        components = component_count,
        version = DOCUMENT_VERSION,
        "description document built"
    );
    Ok(DescriptionDocument::new(spec, components))
}

/// Every `$ref` must be a component reference to a component in the document.
fn check_references(components: &BTreeMap<String, Value>) -> Result<(), BuildError> {
    for (component, schema) in components {
        let mut references = Vec::new();
        collect_refs(schema, &mut references);
        for reference in references {
            let Some(target) = reference.strip_prefix(COMPONENT_REF_PREFIX) else {
                return Err(BuildError::InvalidReference {
                    component: component.clone(),
                    reference,
                });
            };
            if !components.contains_key(target) {
                return Err(BuildError::DanglingReference {
                    component: component.clone(),
                    reference,
                });
            }
        }
    }
    Ok(())
}

/// Collect every `$ref` string in a schema tree.
pub(crate) fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(obj) => collect_object_refs(obj, out),
        Value::Array(items) => {
            for item in items {
                collect_refs(item, out);
            }
        }
        _ => {}
    }
}

fn collect_object_refs(obj: &Map<String, Value>, out: &mut Vec<String>) {
    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        out.push(reference.to_string());
    }
    for (key, child) in obj {
        if key != "$ref" {
            collect_refs(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_refs_walks_nested_values() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"$ref": "#/components/schemas/A"},
                "b": {"type": "array", "items": {"$ref": "#/components/schemas/B"}},
                "c": {"allOf": [{"$ref": "#/components/schemas/C"}]}
            }
        });
        let mut refs = Vec::new();
        collect_refs(&schema, &mut refs);
        refs.sort();
        assert_eq!(
            refs,
            vec![
                "#/components/schemas/A",
                "#/components/schemas/B",
                "#/components/schemas/C"
            ]
        );
    }

    #[test]
    fn non_component_reference_is_rejected() {
        let components = BTreeMap::from([(
            "A".to_string(),
            json!({"properties": {"x": {"$ref": "https://example.com/schema.json"}}}),
        )]);
        assert!(matches!(
            check_references(&components),
            Err(BuildError::InvalidReference { .. })
        ));
    }
}
