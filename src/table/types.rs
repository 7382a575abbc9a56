//! Localisation table data model and persistence.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::encoding::{
    CURRENT_ENCODING_VERSION,
    KeyEncoding,
};
use crate::types::EncodedKey;

#[derive(Error, Debug)]
pub enum TableError {
    /// Expected during lookups: the table has no content for this key.
    #[error("Key not found: {0}")]
    KeyNotFound(EncodedKey),

    #[error("Re-encoding to {target} maps '{first}' and '{second}' onto the same key {key}")]
    ReencodeCollision { target: KeyEncoding, key: EncodedKey, first: String, second: String },

    #[error("Failed to access table file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid table data: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Tables written before the version tag existed used the first encoding.
const fn legacy_encoding() -> KeyEncoding {
    KeyEncoding::V1
}

/// Content for one set of locales, keyed by encoded identifiers.
///
/// The on-disk form is JSON:
///
/// ```json
/// {
///   "supportedLocales": ["en-GB", "en-US"],
///   "encodingVersion": 2,
///   "entries": { "3087324757": "Hello" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalisationTable {
    /// Locale names as written in the file, deduplicated.
    #[serde(default)]
    pub(super) supported_locales: Vec<String>,

    /// Encoding the entry keys were computed with.
    #[serde(default = "legacy_encoding")]
    pub(super) encoding_version: KeyEncoding,

    /// Encoded key → content.
    #[serde(default)]
    pub(super) entries: BTreeMap<EncodedKey, String>,
}

impl Default for LocalisationTable {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl LocalisationTable {
    /// Creates an empty table at the current encoding version.
    #[must_use]
    pub fn new<I, S>(supported_locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_encoding(supported_locales, CURRENT_ENCODING_VERSION)
    }

    #[must_use]
    pub fn with_encoding<I, S>(supported_locales: I, encoding_version: KeyEncoding) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut locales: Vec<String> = Vec::new();
        for locale in supported_locales {
            let locale = locale.into();
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        Self { supported_locales: locales, encoding_version, entries: BTreeMap::new() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, TableError> {
        tracing::debug!("Loading localisation table from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), TableError> {
        tracing::debug!("Saving localisation table to: {:?}", path);
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    #[must_use]
    pub fn supported_locales(&self) -> &[String] {
        &self.supported_locales
    }

    #[must_use]
    pub fn supports(&self, locale: &str) -> bool {
        self.supported_locales.iter().any(|l| l == locale)
    }

    /// A table without locales can never be selected and is dead data.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.supported_locales.is_empty()
    }

    #[must_use]
    pub const fn encoding_version(&self) -> KeyEncoding {
        self.encoding_version
    }

    /// Whether lookups can be trusted as authoritative without migration.
    #[must_use]
    pub fn is_current_encoding(&self) -> bool {
        self.encoding_version.is_current()
    }

    /// Looks up the content stored for `key`.
    ///
    /// # Errors
    /// [`TableError::KeyNotFound`] when the table has no entry for `key`.
    /// Callers are expected to handle this and show a fallback.
    pub fn get(&self, key: EncodedKey) -> Result<&str, TableError> {
        self.entries.get(&key).map(String::as_str).ok_or(TableError::KeyNotFound(key))
    }

    #[must_use]
    pub fn contains(&self, key: EncodedKey) -> bool {
        self.entries.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (EncodedKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Stores a single value, returning the one it replaced.
    pub fn set_entry(&mut self, key: EncodedKey, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key, value.into())
    }

    /// Bulk write used by import pipelines.
    ///
    /// With `empty_only`, existing non-empty values are kept and only absent
    /// or empty entries are written. Returns the number of entries written.
    pub fn set_entries<I>(&mut self, entries: I, empty_only: bool) -> usize
    where
        I: IntoIterator<Item = (EncodedKey, String)>,
    {
        let mut written = 0;
        for (key, value) in entries {
            if empty_only && self.entries.get(&key).is_some_and(|existing| !existing.is_empty()) {
                continue;
            }
            self.entries.insert(key, value);
            written += 1;
        }
        tracing::debug!(written, empty_only, "Table entries updated");
        written
    }
}
