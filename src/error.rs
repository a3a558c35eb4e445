//! Error types for each pipeline stage.
//!
//! Every stage fails fast and hands its error to the caller; nothing is retried
//! or swallowed. [`Error`] is what [`create_api_resource_schemas`] returns.
//!
//! [`create_api_resource_schemas`]: crate::create_api_resource_schemas

use crate::api::GroupVersionKind;
use crate::convert::ConversionErrors;
use thiserror::Error;

/// The description document could not be built.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A requested canonical type name is not in the definition table.
    #[error("cannot find model definition for {name}. If you added a new type, you may need to add it to a definition provider")]
    MissingDefinition { name: String },
    /// A dependency declared by an included definition is not in the table.
    #[error("cannot find model definition for {name}, required by {required_by}")]
    UnresolvedDependency { name: String, required_by: String },
    /// A `$ref` points at a component that is not part of the document.
    #[error("component {component} references {reference}, which is not part of the document")]
    DanglingReference { component: String, reference: String },
    /// A `$ref` does not use the `#/components/schemas/` form.
    #[error("component {component} has unsupported reference {reference}")]
    InvalidReference { component: String, reference: String },
    /// Two canonical type names map to the same component name.
    #[error("{first} and {second} both map to component {component}")]
    ComponentNameConflict {
        component: String,
        first: String,
        second: String,
    },
    /// A definition schema is not a JSON object.
    #[error("definition for {name} is not a schema object")]
    InvalidDefinition { name: String },
    /// The assembled document was rejected by the OpenAPI model.
    #[error("invalid description document: {0}")]
    InvalidDocument(#[source] serde_json::Error),
}

/// The description document could not be flattened or indexed.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A component is a bare reference rather than a concrete schema.
    #[error("component {name} is a reference to {reference} and cannot be resolved to a kind")]
    UnresolvedComponent { name: String, reference: String },
    /// A `$ref` inside a component does not resolve.
    #[error("component {component} references unknown schema {reference}")]
    UnresolvedReference { component: String, reference: String },
    /// Following references leads back to a component already being expanded.
    #[error("recursive reference while expanding {component}: {}", .chain.join(" -> "))]
    RecursiveReference { component: String, chain: Vec<String> },
    /// The `x-kubernetes-group-version-kind` extension is malformed.
    #[error("component {component} has an invalid group-version-kind extension: {source}")]
    InvalidGroupVersionKind {
        component: String,
        #[source]
        source: serde_json::Error,
    },
    /// Two components declare the same group/version/kind.
    #[error("found multiple definitions for {gvk}: {first} and {second}")]
    DuplicateGroupVersionKind {
        gvk: GroupVersionKind,
        first: String,
        second: String,
    },
}

/// Errors returned by the generation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    ModelExtraction(#[from] ModelError),
    /// A requested API has no model after a successful index build.
    #[error("no model indexed for {gvk}; the description document does not cover this API")]
    LookupInvariantViolation { gvk: GroupVersionKind },
    /// The converter reported issues for the first failing API.
    #[error("converting {gvk}: {errors}")]
    Conversion {
        gvk: GroupVersionKind,
        errors: ConversionErrors,
    },
    /// The converted schema could not be encoded as raw JSON.
    #[error("encoding schema for {name}: {source}")]
    SchemaEncoding {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
