#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the description document builder and model indexer

use super::*;
use crate::api::GroupVersionKind;
use crate::definitions::{Definition, DefinitionTable};
use crate::error::{BuildError, ModelError};
use crate::naming::{DefinitionNamer, Scheme};
use serde_json::json;

const WIDGET: &str = "example.io/widgets/v1.Widget";
const WIDGET_SPEC: &str = "example.io/widgets/v1.WidgetSpec";
const GADGET: &str = "example.io/widgets/v1.Gadget";

fn widget_gvk() -> GroupVersionKind {
    GroupVersionKind::new("example.io", "v1", "Widget")
}

fn namer() -> DefinitionNamer {
    let mut scheme = Scheme::new();
    scheme.add_known_type(widget_gvk(), WIDGET);
    DefinitionNamer::new(&[scheme])
}

fn table(namer: &DefinitionNamer) -> DefinitionTable {
    let mut table = DefinitionTable::new();
    table.insert(
        WIDGET,
        Definition::new(json!({
            "type": "object",
            "properties": {
                "spec": {"$ref": namer.reference(WIDGET_SPEC)}
            }
        }))
        .with_dependencies([WIDGET_SPEC]),
    );
    table.insert(
        WIDGET_SPEC,
        Definition::new(json!({
            "type": "object",
            "description": "Desired state.",
            "properties": {"size": {"type": "integer", "format": "int32"}}
        })),
    );
    table
}

#[test]
fn document_contains_requested_types_and_dependencies() {
    let namer = namer();
    let doc = build_description(&table(&namer), &namer, [WIDGET, WIDGET]).unwrap();

    assert_eq!(doc.version(), DOCUMENT_VERSION);
    assert_eq!(
        doc.component_names(),
        vec![
            "io.example.widgets.v1.Widget",
            "io.example.widgets.v1.WidgetSpec"
        ]
    );
}

#[test]
fn missing_requested_name_fails_the_build() {
    let namer = namer();
    let err = build_description(&table(&namer), &namer, [WIDGET, GADGET]).unwrap_err();
    match err {
        BuildError::MissingDefinition { name } => assert_eq!(name, GADGET),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_dependency_names_its_dependent() {
    let namer = namer();
    let mut table = DefinitionTable::new();
    table.insert(
        WIDGET,
        Definition::new(json!({"type": "object"})).with_dependencies([WIDGET_SPEC]),
    );
    let err = build_description(&table, &namer, [WIDGET]).unwrap_err();
    match err {
        BuildError::UnresolvedDependency { name, required_by } => {
            assert_eq!(name, WIDGET_SPEC);
            assert_eq!(required_by, WIDGET);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undeclared_reference_is_dangling() {
    let namer = namer();
    let mut table = DefinitionTable::new();
    table.insert(
        WIDGET,
        Definition::new(json!({
            "type": "object",
            "properties": {"spec": {"$ref": namer.reference(WIDGET_SPEC)}}
        })),
    );
    let err = build_description(&table, &namer, [WIDGET]).unwrap_err();
    assert!(matches!(err, BuildError::DanglingReference { .. }));
}

#[test]
fn non_object_definition_is_rejected() {
    let namer = namer();
    let mut table = DefinitionTable::new();
    table.insert(WIDGET, Definition::new(json!("string")));
    let err = build_description(&table, &namer, [WIDGET]).unwrap_err();
    assert!(matches!(err, BuildError::InvalidDefinition { .. }));
}

#[test]
fn models_inline_references_and_carry_gvks() {
    let namer = namer();
    let doc = build_description(&table(&namer), &namer, [WIDGET]).unwrap();
    let models = to_models(&doc).unwrap();
    assert_eq!(models.len(), 2);

    let widget = models
        .iter()
        .find(|m| m.name == "io.example.widgets.v1.Widget")
        .unwrap();
    assert_eq!(widget.group_version_kinds, vec![widget_gvk()]);
    assert!(widget.schema.get(GVK_EXTENSION).is_none());

    let spec = &widget.schema["properties"]["spec"];
    assert!(spec.get("$ref").is_none());
    assert_eq!(
        spec[REF_NAME_EXTENSION],
        json!("io.example.widgets.v1.WidgetSpec")
    );
    assert_eq!(spec["description"], json!("Desired state."));

    let index = models_by_gvk(models).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(
        index.get(&widget_gvk()).map(|m| m.name.as_str()),
        Some("io.example.widgets.v1.Widget")
    );
}

#[test]
fn two_types_with_the_same_kind_are_rejected() {
    let mut scheme = Scheme::new();
    scheme.add_known_type(widget_gvk(), WIDGET);
    scheme.add_known_type(widget_gvk(), GADGET);
    let namer = DefinitionNamer::new(&[scheme]);

    let mut table = DefinitionTable::new();
    table.insert(WIDGET, Definition::new(json!({"type": "object"})));
    table.insert(GADGET, Definition::new(json!({"type": "object"})));

    let doc = build_description(&table, &namer, [WIDGET, GADGET]).unwrap();
    let err = index_models(&doc).unwrap_err();
    match err {
        ModelError::DuplicateGroupVersionKind { gvk, first, second } => {
            assert_eq!(gvk, widget_gvk());
            assert_eq!(first, "io.example.widgets.v1.Gadget");
            assert_eq!(second, "io.example.widgets.v1.Widget");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn recursive_references_are_reported() {
    let namer = namer();
    let mut table = DefinitionTable::new();
    table.insert(
        WIDGET,
        Definition::new(json!({
            "type": "object",
            "properties": {"children": {"type": "array", "items": {"$ref": namer.reference(WIDGET)}}}
        })),
    );
    let doc = build_description(&table, &namer, [WIDGET]).unwrap();
    let err = to_models(&doc).unwrap_err();
    match err {
        ModelError::RecursiveReference { chain, .. } => {
            assert_eq!(
                chain,
                vec![
                    "io.example.widgets.v1.Widget".to_string(),
                    "io.example.widgets.v1.Widget".to_string()
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn types_without_gvk_are_not_indexed() {
    let namer = DefinitionNamer::default();
    let doc = build_description(&table(&namer), &namer, [WIDGET]).unwrap();
    let index = index_models(&doc).unwrap();
    assert!(index.is_empty());
}

#[test]
fn empty_request_builds_empty_document() {
    let namer = namer();
    let doc = build_description(&table(&namer), &namer, std::iter::empty::<&str>()).unwrap();
    assert!(doc.component_names().is_empty());
    assert!(index_models(&doc).unwrap().is_empty());
}

#[test]
fn keywords_outside_the_openapi_model_reach_the_model() {
    let namer = namer();
    let mut table = DefinitionTable::new();
    table.insert(
        WIDGET,
        Definition::new(json!({
            "type": "object",
            "properties": {
                "nickname": {"type": "string", "nullable": true},
                "spec": {
                    "$ref": namer.reference(WIDGET_SPEC),
                    "description": "Overridden.",
                    "default": {"size": 1}
                }
            }
        }))
        .with_dependencies([WIDGET_SPEC]),
    );
    table.insert(
        WIDGET_SPEC,
        Definition::new(json!({
            "type": "object",
            "description": "Desired state.",
            "x-kubernetes-map-type": "atomic",
            "properties": {"size": {"type": "integer"}}
        })),
    );

    let doc = build_description(&table, &namer, [WIDGET]).unwrap();
    let index = index_models(&doc).unwrap();
    let widget = index.get(&widget_gvk()).unwrap();

    let properties = &widget.schema["properties"];
    assert_eq!(properties["nickname"]["nullable"], json!(true));
    let spec = &properties["spec"];
    assert_eq!(spec["default"], json!({"size": 1}));
    assert_eq!(spec["description"], json!("Overridden."));
    assert_eq!(spec["x-kubernetes-map-type"], json!("atomic"));
    assert_eq!(
        spec[REF_NAME_EXTENSION],
        json!("io.example.widgets.v1.WidgetSpec")
    );
}

#[test]
fn canonical_names_sharing_a_component_name_fail_the_build() {
    const SLASHED: &str = "x.io/a/b.T";
    const DOTTED: &str = "x.io/a.b.T";

    let mut scheme = Scheme::new();
    scheme.add_known_type(GroupVersionKind::new("x.io", "v1", "A"), SLASHED);
    scheme.add_known_type(GroupVersionKind::new("x.io", "v1", "B"), DOTTED);
    let namer = DefinitionNamer::new(&[scheme]);

    let mut table = DefinitionTable::new();
    table.insert(SLASHED, Definition::new(json!({"type": "object"})));
    table.insert(DOTTED, Definition::new(json!({"type": "object"})));

    let err = build_description(&table, &namer, [SLASHED, DOTTED]).unwrap_err();
    match err {
        BuildError::ComponentNameConflict {
            component,
            first,
            second,
        } => {
            assert_eq!(component, "io.x.a.b.T");
            assert_eq!(first, DOTTED);
            assert_eq!(second, SLASHED);
        }
        other => panic!("unexpected error: {other}"),
    }
}
