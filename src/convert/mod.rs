//! # Schema Conversion
//!
//! Turns a structural [`Model`] into the JSON-schema fragment embedded in an
//! `APIResourceSchema` version. The assembler only sees the
//! [`SchemaConverter`] trait; [`StructuralConverter`] is the default
//! implementation.
//!
//! Converters collect every problem in a model before giving up, so a failed
//! conversion carries the full list of [`ConversionIssue`]s.

mod props;
mod structural;

pub use props::{JsonSchemaOrBool, JsonSchemaProps};
pub use structural::StructuralConverter;

use crate::openapi::Model;
use std::fmt;

/// Converts one structural model into a JSON-schema fragment.
pub trait SchemaConverter {
    /// Returns the fragment, or every issue found. `Err` is never empty.
    fn convert(&self, model: &Model) -> Result<JsonSchemaProps, Vec<ConversionIssue>>;
}

impl<F> SchemaConverter for F
where
    F: Fn(&Model) -> Result<JsonSchemaProps, Vec<ConversionIssue>>,
{
    fn convert(&self, model: &Model) -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
        self(model)
    }
}

/// Category of a conversion problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionIssueKind {
    /// Schema has neither a type nor a well-known ref name
    MissingType,
    /// Type is not one of the structural types
    UnsupportedType,
    /// More than one non-null type in a type list
    MultipleTypes,
    /// Array without an `items` schema
    MissingItems,
    /// `items` given as a list
    TupleItems,
    /// `allOf`/`anyOf`/`oneOf` that cannot be reduced to one schema
    Composition,
    /// A value where a schema object was expected
    InvalidSchema,
}

impl ConversionIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionIssueKind::MissingType => "missing_type",
            ConversionIssueKind::UnsupportedType => "unsupported_type",
            ConversionIssueKind::MultipleTypes => "multiple_types",
            ConversionIssueKind::MissingItems => "missing_items",
            ConversionIssueKind::TupleItems => "tuple_items",
            ConversionIssueKind::Composition => "composition",
            ConversionIssueKind::InvalidSchema => "invalid_schema",
        }
    }
}

impl fmt::Display for ConversionIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found while converting a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionIssue {
    /// Dotted path of the offending schema, rooted at the model name
    pub path: String,
    pub kind: ConversionIssueKind,
    pub message: String,
}

impl ConversionIssue {
    pub fn new(
        path: impl Into<String>,
        kind: ConversionIssueKind,
        message: impl Into<String>,
    ) -> Self {
        ConversionIssue {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
    }
}

/// Every issue reported for one failed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionErrors(pub Vec<ConversionIssue>);

impl ConversionErrors {
    pub fn issues(&self) -> &[ConversionIssue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConversionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "issue" } else { "issues" };
        write!(f, "{} {noun}", self.0.len())?;
        for issue in &self.0 {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConversionErrors {}

impl From<Vec<ConversionIssue>> for ConversionErrors {
    fn from(issues: Vec<ConversionIssue>) -> Self {
        ConversionErrors(issues)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn display_lists_every_issue() {
        let errors = ConversionErrors(vec![
            ConversionIssue::new("Widget.spec", ConversionIssueKind::MissingType, "no type"),
            ConversionIssue::new(
                "Widget.tags",
                ConversionIssueKind::MissingItems,
                "array has no items",
            ),
        ]);
        assert_eq!(
            errors.to_string(),
            "2 issues\n  - Widget.spec [missing_type]: no type\n  - Widget.tags [missing_items]: array has no items"
        );
    }

    #[test]
    fn closures_are_converters() {
        let converter = |_: &Model| -> Result<JsonSchemaProps, Vec<ConversionIssue>> {
            Ok(JsonSchemaProps::with_type("object"))
        };
        let model = Model {
            name: "Widget".to_string(),
            schema: serde_json::json!({}),
            group_version_kinds: Vec::new(),
        };
        assert_eq!(
            converter.convert(&model).unwrap().type_.as_deref(),
            Some("object")
        );
    }
}
