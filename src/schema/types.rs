//! Schema data model.

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::encoding::{
    KeyEncoding,
    encode,
};
use crate::types::{
    EncodedKey,
    ResourceType,
};

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse schema: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A named group of keys sharing one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub name: String,
    pub resource_type: ResourceType,
    /// Key names in insertion order.
    pub keys: Vec<String>,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self { name: name.into(), resource_type, keys: Vec::new() }
    }

    /// Builder-style helper used when assembling schemas in code.
    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}

/// Result of [`Schema::find_key`].
///
/// Indices are positions in the ordered sequences and only meaningful for
/// selection in tooling; identity is always the encoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLookup {
    pub valid: bool,
    pub category_index: usize,
    pub key_index: usize,
}

impl KeyLookup {
    const INVALID: Self = Self { valid: false, category_index: 0, key_index: 0 };
}

/// Ordered catalog of categories, each owning an ordered list of keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    pub categories: Vec<Category>,
}

impl Schema {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parses a schema from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a schema from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        tracing::debug!("Loading schema from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Locates a key, reporting its position within the catalog.
    #[must_use]
    pub fn find_key(&self, category: &str, key: &str) -> KeyLookup {
        let Some(category_index) = self.categories.iter().position(|c| c.name == category) else {
            return KeyLookup::INVALID;
        };
        let key_index = self.categories.get(category_index).and_then(|c| c.key_index(key));

        key_index.map_or(KeyLookup::INVALID, |key_index| KeyLookup {
            valid: true,
            category_index,
            key_index,
        })
    }

    /// Iterates every `(category, key)` pair in schema order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Category, &str)> {
        self.categories
            .iter()
            .flat_map(|category| category.keys.iter().map(move |key| (category, key.as_str())))
    }

    /// Iterates every identifier with its encoded key under `version`.
    ///
    /// This is what code generators and exporters enumerate.
    pub fn encoded_keys(
        &self,
        version: KeyEncoding,
    ) -> impl Iterator<Item = (&str, &str, EncodedKey)> {
        self.pairs().map(move |(category, key)| {
            (category.name.as_str(), key, encode(&category.name, key, version))
        })
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.categories.iter().map(|c| c.keys.len()).sum()
    }

    /// Adds `(category, key)` pairs that are not yet in the schema.
    ///
    /// Unknown categories are appended as text categories, in first-seen
    /// order. Returns the number of keys added.
    pub fn merge_pairs<I, C, K>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (C, K)>,
        C: AsRef<str>,
        K: AsRef<str>,
    {
        let mut added = 0;
        for (category_name, key) in pairs {
            let (category_name, key) = (category_name.as_ref(), key.as_ref());

            let index = if let Some(index) =
                self.categories.iter().position(|c| c.name == category_name)
            {
                index
            } else {
                tracing::debug!(category = category_name, "Adding category");
                self.categories.push(Category::new(category_name, ResourceType::Text));
                self.categories.len() - 1
            };

            let Some(category) = self.categories.get_mut(index) else {
                continue;
            };
            if category.key_index(key).is_some() {
                tracing::debug!(category = category_name, key, "Key already exists");
                continue;
            }
            category.keys.push(key.to_string());
            added += 1;
        }
        added
    }
}
