use super::{ConversionIssue, ConversionIssueKind, JsonSchemaOrBool, JsonSchemaProps, SchemaConverter};
use crate::openapi::{Model, REF_NAME_EXTENSION};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

const OBJECT_META: &str = "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta";
const TIME: &str = "io.k8s.apimachinery.pkg.apis.meta.v1.Time";
const MICRO_TIME: &str = "io.k8s.apimachinery.pkg.apis.meta.v1.MicroTime";
const INT_OR_STRING: &str = "io.k8s.apimachinery.pkg.util.intstr.IntOrString";
const QUANTITY: &str = "io.k8s.apimachinery.pkg.api.resource.Quantity";
const RAW_EXTENSION: &str = "io.k8s.apimachinery.pkg.runtime.RawExtension";

/// Default [`SchemaConverter`] producing structural schemas.
///
/// Inlined definitions whose `x-ref-name` is registered as well-known are
/// replaced by a fixed fragment instead of being converted field by field.
/// `ObjectMeta`, `Time`, `MicroTime`, `IntOrString`, `Quantity` and
/// `RawExtension` are registered by [`StructuralConverter::new`].
#[derive(Debug, Clone)]
pub struct StructuralConverter {
    well_known: BTreeMap<String, JsonSchemaProps>,
}

impl Default for StructuralConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralConverter {
    pub fn new() -> Self {
        let date_time = JsonSchemaProps {
            format: Some("date-time".to_string()),
            ..JsonSchemaProps::with_type("string")
        };
        let int_or_string = JsonSchemaProps {
            any_of: vec![
                JsonSchemaProps::with_type("integer"),
                JsonSchemaProps::with_type("string"),
            ],
            x_kubernetes_int_or_string: true,
            ..Default::default()
        };
        let raw_extension = JsonSchemaProps {
            x_kubernetes_preserve_unknown_fields: Some(true),
            ..JsonSchemaProps::with_type("object")
        };

        let mut well_known = BTreeMap::new();
        well_known.insert(OBJECT_META.to_string(), JsonSchemaProps::with_type("object"));
        well_known.insert(TIME.to_string(), date_time.clone());
        well_known.insert(MICRO_TIME.to_string(), date_time);
        well_known.insert(INT_OR_STRING.to_string(), int_or_string.clone());
        well_known.insert(QUANTITY.to_string(), int_or_string);
        well_known.insert(RAW_EXTENSION.to_string(), raw_extension);
        StructuralConverter { well_known }
    }

    /// Converter without any well-known definitions.
    pub fn empty() -> Self {
        StructuralConverter {
            well_known: BTreeMap::new(),
        }
    }

    /// Register a fixed fragment for definitions inlined under `ref_name`.
    pub fn with_well_known(mut self, ref_name: impl Into<String>, props: JsonSchemaProps) -> Self {
        self.well_known.insert(ref_name.into(), props);
        self
    }

    fn convert_schema(
        &self,
        value: &Value,
        path: &str,
        issues: &mut Vec<ConversionIssue>,
    ) -> JsonSchemaProps {
        let Value::Object(obj) = value else {
            issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::InvalidSchema,
                format!("expected a schema object, found {value}"),
            ));
            return JsonSchemaProps::default();
        };
        let description = obj.get("description").and_then(Value::as_str);

        if let Some(ref_name) = obj.get(REF_NAME_EXTENSION).and_then(Value::as_str) {
            if let Some(fixed) = self.well_known.get(ref_name) {
                let mut props = fixed.clone();
                props.describe(description);
                return props;
            }
        }

        if let Some(all_of) = non_empty_array(obj, "allOf") {
            if let [inner] = all_of {
                let mut props = self.convert_schema(inner, path, issues);
                if description.is_some() {
                    props.description = description.map(str::to_string);
                }
                if let Some(default) = obj.get("default").filter(|v| !v.is_null()) {
                    props.default = Some(default.clone());
                }
                return props;
            }
            issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::Composition,
                format!("allOf with {} schemas cannot be merged", all_of.len()),
            ));
            return JsonSchemaProps::default();
        }
        for keyword in ["anyOf", "oneOf"] {
            if non_empty_array(obj, keyword).is_some() {
                issues.push(ConversionIssue::new(
                    path,
                    ConversionIssueKind::Composition,
                    format!("{keyword} is not structural"),
                ));
                return JsonSchemaProps::default();
            }
        }

        let preserve_unknown = obj
            .get("x-kubernetes-preserve-unknown-fields")
            .and_then(Value::as_bool);
        let (type_, nullable) = match obj.get("type") {
            Some(Value::String(type_)) => (Some(type_.clone()), false),
            Some(Value::Array(types)) => {
                let non_null: Vec<&str> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|t| *t != "null")
                    .collect();
                let nullable = non_null.len() < types.len();
                match non_null.as_slice() {
                    [single] => (Some(single.to_string()), nullable),
                    [] => {
                        issues.push(ConversionIssue::new(
                            path,
                            ConversionIssueKind::MissingType,
                            "type list has no non-null type",
                        ));
                        return JsonSchemaProps::default();
                    }
                    many => {
                        issues.push(ConversionIssue::new(
                            path,
                            ConversionIssueKind::MultipleTypes,
                            format!("type list has several types: {}", many.join(", ")),
                        ));
                        return JsonSchemaProps::default();
                    }
                }
            }
            Some(other) => {
                issues.push(ConversionIssue::new(
                    path,
                    ConversionIssueKind::InvalidSchema,
                    format!("type must be a string or a list, found {other}"),
                ));
                return JsonSchemaProps::default();
            }
            // Objects are often declared by their properties alone.
            None if obj.contains_key("properties") || obj.contains_key("additionalProperties") => {
                (Some("object".to_string()), false)
            }
            None if preserve_unknown == Some(true) => (None, false),
            None => {
                issues.push(ConversionIssue::new(
                    path,
                    ConversionIssueKind::MissingType,
                    "schema has no type",
                ));
                return JsonSchemaProps::default();
            }
        };

        let mut props = JsonSchemaProps {
            type_: type_.clone(),
            format: string_field(obj, "format"),
            title: string_field(obj, "title"),
            description: description.map(str::to_string),
            default: obj.get("default").filter(|v| !v.is_null()).cloned(),
            enum_: obj
                .get("enum")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            nullable: nullable || obj.get("nullable").and_then(Value::as_bool) == Some(true),
            x_kubernetes_preserve_unknown_fields: preserve_unknown,
            ..Default::default()
        };

        match type_.as_deref() {
            Some("object") => self.convert_object(obj, path, &mut props, issues),
            Some("array") => self.convert_array(obj, path, &mut props, issues),
            Some("string") => {
                props.pattern = string_field(obj, "pattern");
                props.min_length = obj.get("minLength").and_then(Value::as_u64);
                props.max_length = obj.get("maxLength").and_then(Value::as_u64);
            }
            Some("integer") | Some("number") => {
                props.minimum = obj.get("minimum").and_then(Value::as_f64);
                props.maximum = obj.get("maximum").and_then(Value::as_f64);
            }
            Some("boolean") | None => {}
            Some(other) => issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::UnsupportedType,
                format!("type {other} has no structural equivalent"),
            )),
        }
        props
    }

    fn convert_object(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        props: &mut JsonSchemaProps,
        issues: &mut Vec<ConversionIssue>,
    ) {
        if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
            for (name, schema) in properties {
                let child = self.convert_schema(schema, &format!("{path}.{name}"), issues);
                props.properties.insert(name.clone(), child);
            }
        }
        props.required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        props.additional_properties = match obj.get("additionalProperties") {
            None => None,
            Some(Value::Bool(allowed)) => Some(Box::new(JsonSchemaOrBool::Bool(*allowed))),
            Some(schema) => {
                let values = self.convert_schema(schema, &format!("{path}[*]"), issues);
                Some(Box::new(JsonSchemaOrBool::Schema(values)))
            }
        };
        props.x_kubernetes_map_type = string_field(obj, "x-kubernetes-map-type");
        props.x_kubernetes_embedded_resource = obj
            .get("x-kubernetes-embedded-resource")
            .and_then(Value::as_bool)
            .unwrap_or(false);
    }

    fn convert_array(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        props: &mut JsonSchemaProps,
        issues: &mut Vec<ConversionIssue>,
    ) {
        if non_empty_array(obj, "prefixItems").is_some() {
            issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::TupleItems,
                "prefixItems is not structural",
            ));
        }
        match obj.get("items") {
            None => issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::MissingItems,
                "array has no items schema",
            )),
            Some(Value::Array(_)) => issues.push(ConversionIssue::new(
                path,
                ConversionIssueKind::TupleItems,
                "items must be a single schema",
            )),
            Some(items) => {
                let items = self.convert_schema(items, &format!("{path}[]"), issues);
                props.items = Some(Box::new(items));
            }
        }
        props.min_items = obj.get("minItems").and_then(Value::as_u64);
        props.max_items = obj.get("maxItems").and_then(Value::as_u64);
        props.x_kubernetes_list_type = string_field(obj, "x-kubernetes-list-type");
        props.x_kubernetes_list_map_keys = obj
            .get("x-kubernetes-list-map-keys")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
    }
}

impl SchemaConverter for StructuralConverter {
    fn convert(&self, model: &Model) -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
        let mut issues = Vec::new();
        let props = self.convert_schema(&model.schema, &model.name, &mut issues);
        if issues.is_empty() {
            debug!(model = %model.name, properties = props.properties.len(), "converted model");
            Ok(props)
        } else {
            debug!(model = %model.name, issues = issues.len(), "model conversion failed");
            Err(issues)
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty_array<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .filter(|items| !items.is_empty())
}
