//! Catalog of localisation categories and keys.
/// Schema data model and lookups
mod types;
/// Authoring-time validation
mod validation;

pub use types::{
    Category,
    KeyLookup,
    Schema,
    SchemaError,
};
pub use validation::{
    IssueKind,
    SchemaIssue,
    is_valid_identifier,
    sanitize_identifier,
};
