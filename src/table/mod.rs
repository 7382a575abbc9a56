//! Persisted content store: encoded key → localised string, per locale set.
/// Coverage of a table against a schema
mod coverage;
/// Key encoding migration
mod reencode;
/// Table data model and persistence
mod types;

pub use coverage::TableCoverage;
pub use reencode::ReencodeReport;
pub use types::{
    LocalisationTable,
    TableError,
};
