use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale;
use crate::types::EncodedKey;

/// Token replaced by the encoded key in [`LocaliserSettings::missing_placeholder`].
pub const PLACEHOLDER_KEY_TOKEN: &str = "{key}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLocales[2]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Application-level localisation settings, read from `.localisation.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaliserSettings {
    /// Locale used when the requested one is unparseable or has no table.
    pub default_locale: String,

    /// Locales the application offers. The default locale can only be
    /// overridden with one of these.
    pub supported_locales: Vec<String>,

    pub table_files: TableFilesConfig,

    /// Shown in place of missing content; `{key}` is replaced by the encoded key.
    pub missing_placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl LocaliserSettings {
    /// # Errors
    /// - Locale name is not a known identifier
    /// - Default locale is not in the supported set
    /// - Pattern list is empty or holds an invalid glob
    /// - Placeholder is empty
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if locale::canonicalize(&self.default_locale).is_none() {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!("'{}' is not a known locale identifier. Example: \"en-US\"", self.default_locale),
            ));
        } else if !self.is_supported(&self.default_locale) {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!("'{}' must be one of supportedLocales", self.default_locale),
            ));
        }

        if self.supported_locales.is_empty() {
            errors.push(ValidationError::new(
                "supportedLocales",
                "At least one locale is required. Example: [\"en-US\"]",
            ));
        }

        for (index, name) in self.supported_locales.iter().enumerate() {
            if locale::canonicalize(name).is_none() {
                errors.push(ValidationError::new(
                    format!("supportedLocales[{index}]"),
                    format!("'{name}' is not a known locale identifier"),
                ));
            }
        }

        if self.table_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "tableFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/*.loctable.json\"]",
            ));
        }

        for (index, pattern) in self.table_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("tableFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.table_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("tableFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.missing_placeholder.is_empty() {
            errors.push(ValidationError::new(
                "missingPlaceholder",
                "The placeholder cannot be empty, otherwise missing content is invisible. Example: \"<missing:{key}>\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Whether `name` canonicalises to one of the supported locales.
    #[must_use]
    pub fn is_supported(&self, name: &str) -> bool {
        let Some(wanted) = locale::canonicalize(name) else {
            return false;
        };
        self.supported_locales.iter().any(|l| locale::canonicalize(l) == Some(wanted))
    }

    #[must_use]
    pub fn placeholder_for(&self, key: EncodedKey) -> String {
        self.missing_placeholder.replace(PLACEHOLDER_KEY_TOKEN, &key.to_string())
    }
}

impl Default for TableFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["**/*.loctable.json".to_string()], exclude_patterns: vec![] }
    }
}

impl Default for LocaliserSettings {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            supported_locales: ["en-GB", "en-US", "fr", "it", "de", "es", "pt-BR"]
                .into_iter()
                .map(String::from)
                .collect(),
            table_files: TableFilesConfig::default(),
            missing_placeholder: format!("<missing:{PLACEHOLDER_KEY_TOKEN}>"),
        }
    }
}
