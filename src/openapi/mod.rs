//! # Description Document
//!
//! The description document is an OpenAPI 3.1 document whose
//! `components.schemas` hold exactly the requested types and everything they
//! reference. It is the hand-off point between definition providers and the
//! per-kind structural models the converter works on.
//!
//! ```text
//! DefinitionTable ──build_description──▶ DescriptionDocument
//!                                           │
//!                                       to_models
//!                                           ▼
//!                                      Vec<Model> ──models_by_gvk──▶ ModelIndex
//! ```

mod build;
mod models;

#[cfg(test)]
mod tests;

pub use build::*;
pub use models::*;

use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::BTreeMap;

/// A closed, self-consistent OpenAPI document for a set of types.
///
/// The parsed [`OpenApiV3Spec`] only models the keywords `oas3` knows about,
/// so the component schemas are also kept verbatim and models are flattened
/// from those.
#[derive(Debug, Clone)]
pub struct DescriptionDocument {
    spec: OpenApiV3Spec,
    components: BTreeMap<String, Value>,
}

impl DescriptionDocument {
    pub(crate) fn new(spec: OpenApiV3Spec, components: BTreeMap<String, Value>) -> Self {
        Self { spec, components }
    }

    pub fn spec(&self) -> &OpenApiV3Spec {
        &self.spec
    }

    /// Document version, always [`DOCUMENT_VERSION`].
    pub fn version(&self) -> &str {
        &self.spec.info.version
    }

    /// Component names in document order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    /// Component schemas exactly as they were assembled.
    pub fn components(&self) -> &BTreeMap<String, Value> {
        &self.components
    }

    pub fn into_spec(self) -> OpenApiV3Spec {
        self.spec
    }
}
