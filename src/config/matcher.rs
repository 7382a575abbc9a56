//! Glob matcher deciding which files under a resource root are tables.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::TableFilesConfig;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid table include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid table exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

#[derive(Debug, Clone)]
pub struct TableMatcher {
    /// Directory the patterns are relative to.
    resource_root: PathBuf,
    /// Compiled `includePatterns`.
    include_set: GlobSet,
    /// Compiled `excludePatterns`.
    exclude_set: GlobSet,
}

impl TableMatcher {
    pub fn new(resource_root: PathBuf, config: &TableFilesConfig) -> Result<Self, MatcherError> {
        let include_set = Self::build_glob_set(&config.include_patterns, |pattern, source| {
            MatcherError::InvalidIncludePattern { pattern, source }
        })?;

        let exclude_set = Self::build_glob_set(&config.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { resource_root, include_set, exclude_set })
    }

    /// Compiles `patterns`, reporting the first invalid one through `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// The path must be absolute and under the resource root.
    #[must_use]
    pub fn is_table_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.resource_root).ok() else {
            return false;
        };

        self.is_table_file_relative(relative_path)
    }

    /// Returns true if the path matches an include pattern and no exclude pattern.
    #[must_use]
    pub fn is_table_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
