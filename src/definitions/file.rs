use super::{Definition, DefinitionProvider, ReferenceCallback};
use anyhow::Context;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Definitions loaded from a YAML or JSON file.
///
/// The file maps canonical type names to `{ schema, dependencies? }`. Inside a
/// schema, `$ref` values are canonical type names; they are rewritten through
/// the reference callback when the provider is asked for its definitions, and
/// every referenced name is recorded as a dependency.
///
/// ```yaml
/// example.io/widgets/v1.Widget:
///   schema:
///     type: object
///     properties:
///       spec: { $ref: example.io/widgets/v1.WidgetSpec }
/// example.io/widgets/v1.WidgetSpec:
///   schema: { type: object }
/// ```
#[derive(Debug, Clone)]
pub struct FileDefinitions {
    path: PathBuf,
    raw: BTreeMap<String, Definition>,
}

impl FileDefinitions {
    /// Read and parse a definitions file. `.yaml`/`.yml` are parsed as YAML,
    /// everything else as JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read definitions file: {}", path.display()))?;
        let is_yaml = path
            .extension()
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);
        let raw: BTreeMap<String, Definition> = if is_yaml {
            serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse definitions file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse definitions file: {}", path.display())
            })?
        };
        for (name, definition) in &raw {
            if !definition.schema.is_object() {
                anyhow::bail!(
                    "definition '{}' in {} must be a schema object",
                    name,
                    path.display()
                );
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            raw,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl DefinitionProvider for FileDefinitions {
    fn definitions(&self, refs: ReferenceCallback<'_>) -> BTreeMap<String, Definition> {
        self.raw
            .iter()
            .map(|(name, definition)| {
                let mut schema = definition.schema.clone();
                let mut referenced = BTreeSet::new();
                rewrite_refs(&mut schema, refs, &mut referenced);
                let mut dependencies = definition.dependencies.clone();
                for dep in referenced {
                    if !dependencies.contains(&dep) {
                        dependencies.push(dep);
                    }
                }
                (
                    name.clone(),
                    Definition {
                        schema,
                        dependencies,
                    },
                )
            })
            .collect()
    }
}

fn rewrite_refs(value: &mut Value, refs: ReferenceCallback<'_>, referenced: &mut BTreeSet<String>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(target)) = obj.get_mut("$ref") {
                referenced.insert(target.clone());
                let rewritten = refs(target);
                *target = rewritten;
            }
            for (key, child) in obj.iter_mut() {
                if key != "$ref" {
                    rewrite_refs(child, refs, referenced);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                rewrite_refs(item, refs, referenced);
            }
        }
        _ => {}
    }
}
