//! # internalapis
//!
//! **internalapis** turns descriptors of built-in resource types (namespaces,
//! config maps, secrets, service accounts, ...) into versioned
//! `APIResourceSchema` documents that a dynamic API-serving control plane can
//! register and serve like any other resource.
//!
//! ## Overview
//!
//! Each [`InternalApi`] names a host type by its canonical type name together
//! with its resource names, group/version, scope and whether it has a status
//! subresource. The generator derives a structural JSON schema for the type
//! from its OpenAPI definitions and wraps it in an [`ApiResourceSchema`].
//!
//! ## Architecture
//!
//! - **[`definitions`]** - Definition providers and the merged [`DefinitionTable`]
//! - **[`naming`]** - Canonical names, component names and type schemes
//! - **[`openapi`]** - Description document builder and model index
//! - **[`convert`]** - Model to JSON-schema conversion
//! - **[`assemble`]** - Final schema assembly
//! - **[`pipeline`]** - The stages chained in order
//! - **[`builtin`]** - The default catalog, scheme and definitions
//! - **[`config`]** - Configuration files extending the catalog
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `internalapis-gen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Agg as definitions::aggregate_definitions
//!     participant Build as openapi::build_description
//!     participant Index as openapi::index_models
//!     participant Asm as assemble::assemble
//!     participant Conv as SchemaConverter
//!
//!     Caller->>Agg: providers, reference callback
//!     Agg-->>Caller: DefinitionTable
//!     Caller->>Build: table, namer, canonical names
//!     Build-->>Caller: DescriptionDocument (version 1.0)
//!     Caller->>Index: document
//!     Index-->>Caller: ModelIndex (by group/version/kind)
//!     loop each InternalApi
//!         Caller->>Asm: api
//!         Asm->>Conv: convert(model)
//!         Conv-->>Asm: JsonSchemaProps or issues
//!     end
//!     Asm-->>Caller: Vec<ApiResourceSchema>
//! ```
//!
//! Every stage fails fast; the first error ends the run and nothing partial is
//! returned.
//!
//! ## Quick Start
//!
//! ```rust
//! use internalapis::builtin;
//! use internalapis::convert::StructuralConverter;
//! use internalapis::definitions::DefinitionProvider;
//! use internalapis::create_api_resource_schemas;
//!
//! let providers: [&dyn DefinitionProvider; 2] = [
//!     &builtin::meta_v1_definitions,
//!     &builtin::core_v1_definitions,
//! ];
//! let schemas = create_api_resource_schemas(
//!     &[builtin::core_v1_scheme()],
//!     &providers,
//!     &builtin::internal_apis(),
//!     &StructuralConverter::new(),
//! )?;
//!
//! assert_eq!(schemas[0].name(), "internal.namespaces.core");
//! # Ok::<(), internalapis::Error>(())
//! ```
//!
//! ## Logging
//!
//! All stages emit `tracing` events. Binaries install a subscriber with
//! [`logging::init_logging`]; libraries embedding the generator can use their
//! own.

pub mod api;
pub mod assemble;
pub mod builtin;
pub mod cli;
pub mod config;
pub mod convert;
pub mod definitions;
pub mod error;
pub mod logging;
pub mod naming;
pub mod openapi;
pub mod pipeline;

pub use api::{
    ApiResourceSchema, ApiResourceSchemaSpec, ApiResourceVersion, CanonicalTypeName,
    GroupVersion, GroupVersionKind, InternalApi, ResourceNames, ResourceScope, TypeRef,
};
pub use convert::{ConversionIssue, JsonSchemaProps, SchemaConverter, StructuralConverter};
pub use definitions::{aggregate_definitions, Definition, DefinitionProvider, DefinitionTable};
pub use error::{BuildError, Error, ModelError};
pub use naming::{DefinitionNamer, Scheme};
pub use openapi::{build_description, index_models, DescriptionDocument, Model, ModelIndex};
pub use pipeline::{create_api_resource_schemas, describe_apis};
