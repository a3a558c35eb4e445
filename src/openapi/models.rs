use super::{DescriptionDocument, GVK_EXTENSION};
use crate::api::GroupVersionKind;
use crate::error::ModelError;
use crate::naming::COMPONENT_REF_PREFIX;
use oas3::spec::ObjectOrReference;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker added to inlined references naming the component they came from.
pub const REF_NAME_EXTENSION: &str = "x-ref-name";

/// Structural model of one component with every reference inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Component name in the description document.
    pub name: String,
    /// Schema with `$ref`s replaced by the referenced schema. Each inlined
    /// schema carries [`REF_NAME_EXTENSION`].
    pub schema: Value,
    /// Group/version/kinds the component is served as, sorted.
    pub group_version_kinds: Vec<GroupVersionKind>,
}

/// Models keyed by group/version/kind.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    by_gvk: BTreeMap<GroupVersionKind, Arc<Model>>,
}

impl ModelIndex {
    pub fn get(&self, gvk: &GroupVersionKind) -> Option<&Model> {
        self.by_gvk.get(gvk).map(Arc::as_ref)
    }

    pub fn contains(&self, gvk: &GroupVersionKind) -> bool {
        self.by_gvk.contains_key(gvk)
    }

    pub fn len(&self) -> usize {
        self.by_gvk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_gvk.is_empty()
    }

    /// Iterates entries in GVK order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupVersionKind, &Model)> {
        self.by_gvk.iter().map(|(gvk, model)| (gvk, model.as_ref()))
    }
}

/// Flatten the document into one model per component.
pub fn to_models(doc: &DescriptionDocument) -> Result<Vec<Model>, ModelError> {
    if let Some(components) = doc.spec().components.as_ref() {
        for (name, schema_ref) in &components.schemas {
            if let ObjectOrReference::Ref { ref_path, .. } = schema_ref {
                return Err(ModelError::UnresolvedComponent {
                    name: name.clone(),
                    reference: ref_path.clone(),
                });
            }
        }
    }

    let raw = doc.components();
    let mut models = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        let mut group_version_kinds: Vec<GroupVersionKind> = match value.get(GVK_EXTENSION) {
            Some(extension) => serde_json::from_value(extension.clone()).map_err(|source| {
                ModelError::InvalidGroupVersionKind {
                    component: name.clone(),
                    source,
                }
            })?,
            None => Vec::new(),
        };
        group_version_kinds.sort();
        group_version_kinds.dedup();

        let mut schema = value.clone();
        if let Value::Object(obj) = &mut schema {
            obj.remove(GVK_EXTENSION);
        }
        let mut chain = vec![name.clone()];
        inline_refs(raw, name, &mut schema, &mut chain)?;

        models.push(Model {
            name: name.clone(),
            schema,
            group_version_kinds,
        });
    }

    debug!(models = models.len(), "flattened description document");
    Ok(models)
}

/// Replace every `$ref` under `value` with the referenced component.
///
/// `chain` holds the components currently being expanded; meeting one of them
/// again is a cycle.
fn inline_refs(
    components: &BTreeMap<String, Value>,
    component: &str,
    value: &mut Value,
    chain: &mut Vec<String>,
) -> Result<(), ModelError> {
    match value {
        Value::Object(obj) => {
            let reference = obj.get("$ref").and_then(Value::as_str).map(str::to_string);
            if let Some(reference) = reference {
                let target = reference
                    .strip_prefix(COMPONENT_REF_PREFIX)
                    .and_then(|name| components.get_key_value(name));
                let Some((target, resolved)) = target else {
                    return Err(ModelError::UnresolvedReference {
                        component: component.to_string(),
                        reference,
                    });
                };
                if chain.iter().any(|seen| seen == target) {
                    let mut cycle = chain.clone();
                    cycle.push(target.clone());
                    return Err(ModelError::RecursiveReference {
                        component: component.to_string(),
                        chain: cycle,
                    });
                }

                let mut expanded = resolved.clone();
                if let Value::Object(inlined) = &mut expanded {
                    inlined.remove(GVK_EXTENSION);
                    // Siblings of `$ref` override the target's keywords.
                    for (key, sibling) in obj.iter() {
                        if key != "$ref" {
                            inlined.insert(key.clone(), sibling.clone());
                        }
                    }
                    inlined.insert(
                        REF_NAME_EXTENSION.to_string(),
                        Value::String(target.clone()),
                    );
                }

                chain.push(target.clone());
                inline_refs(components, component, &mut expanded, chain)?;
                chain.pop();

                *value = expanded;
                return Ok(());
            }
            for child in obj.values_mut() {
                inline_refs(components, component, child, chain)?;
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(components, component, item, chain)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Index models by every group/version/kind they declare.
///
/// Models without a GVK are dependencies only and are left out of the index.
pub fn models_by_gvk(models: Vec<Model>) -> Result<ModelIndex, ModelError> {
    let mut by_gvk: BTreeMap<GroupVersionKind, Arc<Model>> = BTreeMap::new();
    for model in models {
        if model.group_version_kinds.is_empty() {
            continue;
        }
        let model = Arc::new(model);
        for gvk in &model.group_version_kinds {
            if let Some(existing) = by_gvk.get(gvk) {
                return Err(ModelError::DuplicateGroupVersionKind {
                    gvk: gvk.clone(),
                    first: existing.name.clone(),
                    second: model.name.clone(),
                });
            }
            by_gvk.insert(gvk.clone(), Arc::clone(&model));
        }
    }
    info!(kinds = by_gvk.len(), "model index built");
    Ok(ModelIndex { by_gvk })
}

/// Flatten and index a description document.
pub fn index_models(doc: &DescriptionDocument) -> Result<ModelIndex, ModelError> {
    models_by_gvk(to_models(doc)?)
}
