//! # Structural Definitions
//!
//! A [`Definition`] is the field-by-field shape of one host type, expressed as
//! an OpenAPI schema object. Definitions come from providers: any number of
//! [`DefinitionProvider`]s are asked for their definitions in order and the
//! results are merged into a single [`DefinitionTable`], later providers
//! replacing earlier ones on collision.
//!
//! Providers never see component names directly. They receive a reference
//! callback that turns a canonical type name into the `$ref` path used in the
//! description document, so naming stays owned by
//! [`DefinitionNamer`](crate::naming::DefinitionNamer).

mod file;

pub use file::FileDefinitions;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Callback turning a canonical type name into a `$ref` path.
pub type ReferenceCallback<'a> = &'a dyn Fn(&str) -> String;

/// Structural definition of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// OpenAPI schema object. References to other types use `$ref` paths
    /// produced by the reference callback.
    pub schema: Value,
    /// Canonical names of the types `schema` references.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Definition {
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }
}

/// Source of structural definitions keyed by canonical type name.
pub trait DefinitionProvider {
    fn definitions(&self, refs: ReferenceCallback<'_>) -> BTreeMap<String, Definition>;
}

impl<F> DefinitionProvider for F
where
    F: Fn(ReferenceCallback<'_>) -> BTreeMap<String, Definition>,
{
    fn definitions(&self, refs: ReferenceCallback<'_>) -> BTreeMap<String, Definition> {
        self(refs)
    }
}

/// Merged lookup table of definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionTable {
    entries: BTreeMap<String, Definition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `overlay` into the table. Entries in `overlay` replace existing
    /// entries with the same name. Returns the number of replaced entries.
    pub fn merge(&mut self, overlay: BTreeMap<String, Definition>) -> usize {
        let mut replaced = 0;
        for (name, definition) in overlay {
            if self.entries.insert(name.clone(), definition).is_some() {
                debug!(canonical_name = %name, "definition overridden by later provider");
                replaced += 1;
            }
        }
        replaced
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) {
        self.entries.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates definitions in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.entries
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }
}

impl FromIterator<(String, Definition)> for DefinitionTable {
    fn from_iter<T: IntoIterator<Item = (String, Definition)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Ask every provider for its definitions, in order, and merge the results.
pub fn aggregate_definitions(
    providers: &[&dyn DefinitionProvider],
    refs: ReferenceCallback<'_>,
) -> DefinitionTable {
    let mut table = DefinitionTable::new();
    let mut overridden = 0;
    for (position, provider) in providers.iter().enumerate() {
        let definitions = provider.definitions(refs);
        debug!(
            provider = position,
            definitions = definitions.len(),
            "collected definitions"
        );
        overridden += table.merge(definitions);
    }
    if overridden > 0 {
        warn!(overridden, "later definition providers replaced earlier definitions");
    }
    info!(
        providers = providers.len(),
        definitions = table.len(),
        "definition table aggregated"
    );
    table
}
