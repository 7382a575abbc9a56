//! Authoring-time schema checks.
//!
//! Validation never stops at the first problem: tooling wants to highlight
//! every offending entry in one pass.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::Schema;

/// Well-formed category or key name.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9-]*$";
/// Characters removed by [`sanitize_identifier`].
const DISALLOWED_CHARS_PATTERN: &str = r"[^a-zA-Z0-9\-]";
/// Prefix that cannot start an identifier.
const LEADING_DIGITS_PATTERN: &str = r"^[\d-]*";

/// Compiled [`IDENTIFIER_PATTERN`].
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| compile(IDENTIFIER_PATTERN));
/// Compiled [`DISALLOWED_CHARS_PATTERN`].
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| compile(DISALLOWED_CHARS_PATTERN));
/// Compiled [`LEADING_DIGITS_PATTERN`].
static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(LEADING_DIGITS_PATTERN));

/// Compiles one of the literal patterns above.
#[allow(clippy::expect_used)] // literal patterns; `literal_patterns_compile` covers them
fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("literal identifier pattern is valid")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    BlankCategory,
    DuplicateCategory,
    BlankKey,
    DuplicateKey,
    InvalidName,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Schema error in '{path}': {message}")]
pub struct SchemaIssue {
    pub kind: IssueKind,
    /// Location in the schema (e.g., "categories[1].keys[3]")
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    /// Builds an issue at `path`.
    fn new(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, path: path.into(), message: message.into() }
    }
}

/// Returns true if `name` is a well-formed category or key name.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Cleans raw user input into an identifier-safe name.
///
/// Trims, drops anything outside `[A-Za-z0-9-]`, then drops leading digits
/// and hyphens. The result may be empty.
///
/// # Examples
/// ```
/// use locale_tables::schema::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("  Main Menu! "), "MainMenu");
/// assert_eq!(sanitize_identifier("01-intro"), "intro");
/// ```
#[must_use]
pub fn sanitize_identifier(raw: &str) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(raw.trim(), "");
    LEADING_DIGITS.replace(&stripped, "").into_owned()
}

/// Counts occurrences while remembering first-seen order.
fn count_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for name in names {
        if let Some(&pos) = positions.get(name) {
            if let Some(entry) = order.get_mut(pos) {
                entry.1 += 1;
            }
        } else {
            positions.insert(name, order.len());
            order.push((name, 1));
        }
    }
    order
}

impl Schema {
    /// # Errors
    /// - Category name is blank, duplicated or not identifier-safe
    /// - Key name is blank, duplicated within its category or not identifier-safe
    pub fn validate(&self) -> Result<(), Vec<SchemaIssue>> {
        let mut issues = Vec::new();

        for (index, category) in self.categories.iter().enumerate() {
            let path = format!("categories[{index}]");
            if category.name.trim().is_empty() {
                issues.push(SchemaIssue::new(
                    IssueKind::BlankCategory,
                    path,
                    "Categories without a name exist - please populate them",
                ));
            } else if !is_valid_identifier(&category.name) {
                issues.push(SchemaIssue::new(
                    IssueKind::InvalidName,
                    path,
                    format!(
                        "Category name '{}' must start with a letter and contain only letters, digits or '-'",
                        category.name
                    ),
                ));
            }
        }

        for (name, count) in count_names(self.categories.iter().map(|c| c.name.as_str())) {
            if count > 1 && !name.trim().is_empty() {
                issues.push(SchemaIssue::new(
                    IssueKind::DuplicateCategory,
                    "categories",
                    format!("The name '{name}' belongs to {count} categories - they must be unique"),
                ));
            }
        }

        for (category_index, category) in self.categories.iter().enumerate() {
            for (key_index, key) in category.keys.iter().enumerate() {
                let path = format!("categories[{category_index}].keys[{key_index}]");
                if key.trim().is_empty() {
                    issues.push(SchemaIssue::new(
                        IssueKind::BlankKey,
                        path,
                        format!("Blank keys exist in category '{}' - please populate them", category.name),
                    ));
                } else if !is_valid_identifier(key) {
                    issues.push(SchemaIssue::new(
                        IssueKind::InvalidName,
                        path,
                        format!(
                            "Key name '{key}' must start with a letter and contain only letters, digits or '-'"
                        ),
                    ));
                }
            }

            for (key, count) in count_names(category.keys.iter().map(String::as_str)) {
                if count > 1 && !key.trim().is_empty() {
                    issues.push(SchemaIssue::new(
                        IssueKind::DuplicateKey,
                        format!("categories[{category_index}].keys"),
                        format!(
                            "The key '{key}' exists {count} times in category '{}' - they must be unique",
                            category.name
                        ),
                    ));
                }
            }
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}
