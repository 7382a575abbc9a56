//! Boundary to the host's asset storage: table discovery and loading.
/// Directory-tree implementation
mod filesystem;
/// Source trait and handles
mod types;

pub use filesystem::FsTableSource;
pub use types::{
    SourceError,
    TableHandle,
    TableSource,
};
