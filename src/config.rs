//! Generator configuration
//!
//! A configuration file extends (or replaces) the built-in catalog with extra
//! APIs, scheme registrations and definition files. It is looked up next to
//! the working directory as `internalapis.toml` unless a path is given.
//!
//! ```toml
//! include_builtin = true
//! definition_files = ["definitions/widgets.yaml"]
//!
//! [[known_types]]
//! canonical_type = "example.io/widgets/v1.Widget"
//! group = "example.io"
//! version = "v1"
//! kind = "Widget"
//!
//! [[apis]]
//! instance = "example.io/widgets/v1.Widget"
//! scope = "Namespaced"
//! hasStatus = true
//! names = { plural = "widgets", singular = "widget", kind = "Widget" }
//! groupVersion = { group = "example.io", version = "v1" }
//! ```
//!
//! YAML (`.yaml`/`.yml`) and JSON (`.json`) files with the same shape are
//! accepted too.

use crate::api::{GroupVersionKind, InternalApi};
use crate::builtin;
use crate::definitions::{DefinitionProvider, FileDefinitions};
use crate::naming::Scheme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "internalapis.toml";

/// Generator configuration loaded from `internalapis.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// Start from the built-in catalog, scheme and definitions
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// APIs generated after the built-in ones
    #[serde(default)]
    pub apis: Vec<InternalApi>,

    /// Extra group/version/kind registrations
    #[serde(default)]
    pub known_types: Vec<KnownType>,

    /// Definition files, relative to the configuration file
    #[serde(default)]
    pub definition_files: Vec<PathBuf>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            apis: Vec::new(),
            known_types: Vec::new(),
            definition_files: Vec::new(),
        }
    }
}

/// One scheme registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownType {
    pub canonical_type: String,
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl KnownType {
    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::new(
            self.group.as_str(),
            self.version.as_str(),
            self.kind.as_str(),
        )
    }
}

/// Everything a generation run needs, loaded from a configuration.
pub struct GeneratorInputs {
    pub apis: Vec<InternalApi>,
    pub schemes: Vec<Scheme>,
    pub providers: Vec<Box<dyn DefinitionProvider>>,
}

impl GeneratorInputs {
    /// The built-in catalog on its own.
    pub fn builtin() -> Self {
        let providers: Vec<Box<dyn DefinitionProvider>> = vec![
            Box::new(builtin::meta_v1_definitions),
            Box::new(builtin::core_v1_definitions),
        ];
        Self {
            apis: builtin::internal_apis(),
            schemes: vec![builtin::core_v1_scheme()],
            providers,
        }
    }

    /// Providers in merge order, as the pipeline takes them.
    pub fn provider_refs(&self) -> Vec<&dyn DefinitionProvider> {
        self.providers.iter().map(|provider| provider.as_ref()).collect()
    }
}

impl std::fmt::Debug for GeneratorInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorInputs")
            .field("apis", &self.apis)
            .field("schemes", &self.schemes)
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl GeneratorConfig {
    /// Load every input the configuration names.
    ///
    /// Built-in inputs come first so configured definitions replace built-in
    /// ones of the same name.
    pub fn inputs(&self, base_dir: &Path) -> anyhow::Result<GeneratorInputs> {
        let mut inputs = if self.include_builtin {
            GeneratorInputs::builtin()
        } else {
            GeneratorInputs {
                apis: Vec::new(),
                schemes: Vec::new(),
                providers: Vec::new(),
            }
        };

        inputs.apis.extend(self.apis.iter().cloned());

        if !self.known_types.is_empty() {
            let mut scheme = Scheme::new();
            for known in &self.known_types {
                scheme.add_known_type(known.group_version_kind(), known.canonical_type.as_str());
            }
            inputs.schemes.push(scheme);
        }

        for file in &self.definition_files {
            let path = base_dir.join(file);
            let definitions = FileDefinitions::load(&path)
                .with_context(|| format!("Failed to load definition file: {}", path.display()))?;
            debug!(path = %path.display(), definitions = definitions.len(), "loaded definition file");
            inputs.providers.push(Box::new(definitions));
        }

        info!(
            apis = inputs.apis.len(),
            schemes = inputs.schemes.len(),
            providers = inputs.providers.len(),
            builtin = self.include_builtin,
            "generator inputs loaded"
        );
        Ok(inputs)
    }
}

/// Load a generator configuration from TOML, YAML or JSON, chosen by extension.
pub fn load_config(config_path: &Path) -> anyhow::Result<GeneratorConfig> {
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let extension = config_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("toml");
    let config: GeneratorConfig = match extension {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?,
        _ => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?,
    };
    Ok(config)
}

/// Resolve the configuration path
///
/// Priority:
/// 1. Explicitly provided path (via CLI), whether or not it exists
/// 2. `internalapis.toml` in `dir`
/// 3. None (built-in catalog only)
pub fn resolve_config_path(explicit_path: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}
