//! # Definition Naming
//!
//! Maps canonical type names (`k8s.io/api/core/v1.Namespace`) to the friendly
//! component names used inside the description document
//! (`io.k8s.api.core.v1.Namespace`) and to the group/version/kinds each type
//! is registered under.
//!
//! A [`Scheme`] is a registry of known types. A [`DefinitionNamer`] merges
//! one or more schemes and is the single source of component names, `$ref`
//! paths and GVK extensions for a generation run.

use crate::api::GroupVersionKind;
use std::collections::BTreeMap;

/// Prefix of every component reference in the description document.
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Convert a canonical type name into a dotted, reverse-domain component name.
///
/// The domain of the first path segment is reversed and the remaining `/`
/// separators become `.`:
///
/// ```rust
/// use internalapis::naming::friendly_name;
///
/// assert_eq!(
///     friendly_name("k8s.io/api/core/v1.Namespace"),
///     "io.k8s.api.core.v1.Namespace"
/// );
/// ```
pub fn friendly_name(canonical: &str) -> String {
    let Some((domain, rest)) = canonical.split_once('/') else {
        return canonical.to_string();
    };
    let mut segments: Vec<&str> = domain.split('.').collect();
    segments.reverse();
    let mut name = segments.join(".");
    if !rest.is_empty() {
        name.push('.');
        name.push_str(&rest.replace('/', "."));
    }
    name
}

/// `$ref` path for a component name.
pub fn component_ref(definition_name: &str) -> String {
    format!("{COMPONENT_REF_PREFIX}{definition_name}")
}

/// Registry of known types and the group/version/kinds they are served as.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    known_types: BTreeMap<String, Vec<GroupVersionKind>>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `canonical` under `gvk`. Registering the same pair twice is a no-op.
    pub fn add_known_type(&mut self, gvk: GroupVersionKind, canonical: impl Into<String>) {
        let entry = self.known_types.entry(canonical.into()).or_default();
        if !entry.contains(&gvk) {
            entry.push(gvk);
        }
    }

    pub fn group_version_kinds(&self, canonical: &str) -> &[GroupVersionKind] {
        self.known_types
            .get(canonical)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.known_types.is_empty()
    }

    /// Iterates registered canonical names in stable order.
    pub fn known_types(&self) -> impl Iterator<Item = (&str, &[GroupVersionKind])> {
        self.known_types
            .iter()
            .map(|(name, gvks)| (name.as_str(), gvks.as_slice()))
    }
}

/// Names definitions and attaches GVKs from a set of schemes.
#[derive(Debug, Clone, Default)]
pub struct DefinitionNamer {
    gvks: BTreeMap<String, Vec<GroupVersionKind>>,
}

impl DefinitionNamer {
    pub fn new(schemes: &[Scheme]) -> Self {
        let mut gvks: BTreeMap<String, Vec<GroupVersionKind>> = BTreeMap::new();
        for scheme in schemes {
            for (name, kinds) in scheme.known_types() {
                let entry = gvks.entry(name.to_string()).or_default();
                for gvk in kinds {
                    if !entry.contains(gvk) {
                        entry.push(gvk.clone());
                    }
                }
            }
        }
        for kinds in gvks.values_mut() {
            kinds.sort();
        }
        Self { gvks }
    }

    /// Component name for a canonical type name.
    pub fn definition_name(&self, canonical: &str) -> String {
        friendly_name(canonical)
    }

    /// `$ref` path pointing at the component for `canonical`.
    pub fn reference(&self, canonical: &str) -> String {
        component_ref(&self.definition_name(canonical))
    }

    /// GVKs the type is registered under, sorted. Empty for unregistered types.
    pub fn group_version_kinds(&self, canonical: &str) -> &[GroupVersionKind] {
        self.gvks
            .get(canonical)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_name_reverses_domain() {
        assert_eq!(
            friendly_name("k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta"),
            "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta"
        );
        assert_eq!(
            friendly_name("github.com/acme/widgets/v1.Widget"),
            "com.github.acme.widgets.v1.Widget"
        );
    }

    #[test]
    fn friendly_name_without_path_is_unchanged() {
        assert_eq!(friendly_name("Widget"), "Widget");
        assert_eq!(friendly_name("example.io/"), "io.example");
    }

    #[test]
    fn namer_merges_schemes_without_duplicates() {
        let gvk = GroupVersionKind::new("", "v1", "Namespace");
        let mut a = Scheme::new();
        a.add_known_type(gvk.clone(), "k8s.io/api/core/v1.Namespace");
        let mut b = Scheme::new();
        b.add_known_type(gvk.clone(), "k8s.io/api/core/v1.Namespace");
        b.add_known_type(
            GroupVersionKind::new("", "v1", "ConfigMap"),
            "k8s.io/api/core/v1.ConfigMap",
        );

        let namer = DefinitionNamer::new(&[a, b]);
        assert_eq!(
            namer.group_version_kinds("k8s.io/api/core/v1.Namespace"),
            &[gvk]
        );
        assert!(namer
            .group_version_kinds("k8s.io/api/core/v1.Secret")
            .is_empty());
        assert_eq!(
            namer.reference("k8s.io/api/core/v1.ConfigMap"),
            "#/components/schemas/io.k8s.api.core.v1.ConfigMap"
        );
    }
}
