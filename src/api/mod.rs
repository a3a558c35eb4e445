//! Input descriptors and output schema objects.
//!
//! [`InternalApi`] describes a built-in type that should be served as an API
//! resource; [`ApiResourceSchema`] is what the pipeline produces for it.

mod types;

pub use types::*;
